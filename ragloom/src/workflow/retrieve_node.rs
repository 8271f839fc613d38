//! Retrieve stage.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::retrieval::Retriever;
use crate::state::WorkflowState;

/// Calls the retriever with the question and stores the chunks.
///
/// Question and answer are carried over unchanged. A retriever error
/// (including [`AgentError::NotInitialized`]) is returned as-is.
pub struct RetrieveNode {
    retriever: Arc<dyn Retriever>,
    k: usize,
}

impl RetrieveNode {
    pub fn new(retriever: Arc<dyn Retriever>, k: usize) -> Self {
        Self { retriever, k }
    }
}

#[async_trait]
impl Node<WorkflowState> for RetrieveNode {
    fn id(&self) -> &str {
        "retrieve"
    }

    async fn run(&self, state: WorkflowState) -> Result<(WorkflowState, Next), AgentError> {
        let chunks = self.retriever.retrieve(state.question(), self.k).await?;
        tracing::debug!(chunks = chunks.len(), k = self.k, "retrieved");
        Ok((state.with_chunks(chunks), Next::Continue))
    }
}
