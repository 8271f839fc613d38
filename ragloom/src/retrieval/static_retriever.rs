//! Retriever over a fixed chunk list; records the queries it receives.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::Chunk;

use super::{ensure_positive_k, Retriever};

/// Returns the first `k` of a fixed set of chunks for every query.
///
/// Used in tests and offline demos where no index is available.
#[derive(Debug, Default)]
pub struct StaticRetriever {
    chunks: Vec<Chunk>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl StaticRetriever {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self {
            chunks,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Retriever that always returns no chunks.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// `(query, k)` pairs seen so far, in call order.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>, AgentError> {
        ensure_positive_k(k)?;
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((query.to_string(), k));
        Ok(self.chunks.iter().take(k).cloned().collect())
    }
}
