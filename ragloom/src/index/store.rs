//! One-time-built vector store and its retriever handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::AgentError;
use crate::retrieval::{ensure_positive_k, Retriever, DEFAULT_TOP_K};
use crate::state::Chunk;

use super::{Embedder, IndexError, VectorIndex};

/// Holder for a [`VectorIndex`] that is built at most once.
///
/// Queries before [`VectorStore::create`] fail with [`AgentError::NotInitialized`];
/// concurrent readers after it see the same fully built index.
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    index: OnceCell<Arc<VectorIndex>>,
}

impl VectorStore {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            index: OnceCell::new(),
        }
    }

    /// Builds the index from `chunks`. A second call fails with [`IndexError::AlreadyInitialized`].
    pub async fn create(&self, chunks: Vec<Chunk>) -> Result<usize, IndexError> {
        if self.index.initialized() {
            return Err(IndexError::AlreadyInitialized);
        }
        let index = VectorIndex::build(chunks, Arc::clone(&self.embedder)).await?;
        let len = index.len();
        self.index
            .set(Arc::new(index))
            .map_err(|_| IndexError::AlreadyInitialized)?;
        Ok(len)
    }

    pub fn is_initialized(&self) -> bool {
        self.index.initialized()
    }

    /// Number of indexed chunks; 0 before `create`.
    pub fn len(&self) -> usize {
        self.index.get().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(&self) -> Result<&Arc<VectorIndex>, AgentError> {
        self.index.get().ok_or_else(|| {
            AgentError::NotInitialized("vector store has not been created".to_string())
        })
    }

    /// Top-k chunks for `query`.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>, AgentError> {
        ensure_positive_k(k)?;
        self.index()?.search(query, k).await
    }

    /// Retriever handle whose `retrieve_default` returns `k` chunks.
    pub fn retriever(self: &Arc<Self>, k: usize) -> VectorStoreRetriever {
        VectorStoreRetriever {
            store: Arc::clone(self),
            default_k: if k == 0 { DEFAULT_TOP_K } else { k },
        }
    }
}

/// [`Retriever`] over a shared [`VectorStore`].
#[derive(Clone)]
pub struct VectorStoreRetriever {
    store: Arc<VectorStore>,
    default_k: usize,
}

impl VectorStoreRetriever {
    pub fn default_k(&self) -> usize {
        self.default_k
    }
}

#[async_trait]
impl Retriever for VectorStoreRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>, AgentError> {
        self.store.retrieve(query, k).await
    }

    async fn retrieve_default(&self, query: &str) -> Result<Vec<Chunk>, AgentError> {
        self.store.retrieve(query, self.default_k).await
    }
}
