use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::retrieval::Retriever;
use crate::state::Chunk;
use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::r#trait::Tool;

use super::{query_arg, query_schema};

/// Tool name for the corpus retriever.
pub const TOOL_RETRIEVER: &str = "retriever";

/// Most chunks included in one corpus tool result.
pub const CORPUS_TOOL_MAX_CHUNKS: usize = 8;

/// Result text when retrieval finds nothing. A valid observation, not an error.
pub const NO_DOCUMENTS_FOUND: &str = "No documents found.";

/// Formats chunks as `[i] label\ncontent` blocks (1-based) separated by a blank line.
///
/// The label is the chunk's title, else its source, else `doc_i`.
pub fn format_chunks(chunks: &[Chunk]) -> String {
    if chunks.is_empty() {
        return NO_DOCUMENTS_FOUND.to_string();
    }
    chunks
        .iter()
        .take(CORPUS_TOOL_MAX_CHUNKS)
        .enumerate()
        .map(|(i, c)| {
            let n = i + 1;
            let label = c
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| format!("doc_{}", n));
            format!("[{}] {}\n{}", n, label, c.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Retrieval-backed tool over the indexed corpus.
pub struct CorpusTool {
    retriever: Arc<dyn Retriever>,
}

impl CorpusTool {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for CorpusTool {
    fn name(&self) -> &str {
        TOOL_RETRIEVER
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_RETRIEVER.to_string(),
            description: Some("Fetch passages from indexed corpus.".to_string()),
            input_schema: query_schema("What to look up in the user-provided documents."),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let query = query_arg(&args)?;
        let chunks = self
            .retriever
            .retrieve_default(query)
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?;
        tracing::debug!(tool = TOOL_RETRIEVER, query, hits = chunks.len(), "corpus lookup");
        Ok(ToolCallContent {
            text: format_chunks(&chunks),
        })
    }
}
