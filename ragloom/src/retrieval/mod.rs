//! Retrieval port: given a query, return the top-k most relevant chunks.
//!
//! The Retrieve stage and the corpus tool depend on [`Retriever`] only.
//! Implementations: [`VectorStoreRetriever`](crate::index::VectorStoreRetriever)
//! over a built index, and [`StaticRetriever`] for tests and demos.

mod static_retriever;

pub use static_retriever::StaticRetriever;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::Chunk;

/// Number of chunks returned when the caller does not choose `k`.
pub const DEFAULT_TOP_K: usize = 4;

/// Top-k retrieval over an indexed corpus.
///
/// Must be safe for concurrent read-only queries. Implementations return
/// [`AgentError::NotInitialized`] when the backing index does not exist yet.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Up to `k` chunks, most relevant first.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>, AgentError>;

    /// Same as [`Retriever::retrieve`] with [`DEFAULT_TOP_K`].
    async fn retrieve_default(&self, query: &str) -> Result<Vec<Chunk>, AgentError> {
        self.retrieve(query, DEFAULT_TOP_K).await
    }
}

/// Rejects `k == 0`; retrieval counts are positive.
pub(crate) fn ensure_positive_k(k: usize) -> Result<(), AgentError> {
    if k == 0 {
        return Err(AgentError::ExecutionFailed(
            "retrieval k must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
