//! Index collaborator: embed chunks once, answer similarity queries after.
//!
//! [`VectorIndex`] is the immutable result of a build. [`VectorStore`] owns the
//! one-time build and hands out [`VectorStoreRetriever`]s; retrieval before the
//! build fails with [`AgentError::NotInitialized`](crate::error::AgentError::NotInitialized).

mod embedder;
mod openai_embedder;
mod store;
mod vector_index;

pub use embedder::{Embedder, HashEmbedder};
pub use openai_embedder::OpenAIEmbedder;
pub use store::{VectorStore, VectorStoreRetriever};
pub use vector_index::{cosine_similarity, VectorIndex, EMBED_BATCH_SIZE};

use thiserror::Error;

/// Errors raised while building an index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The embedding backend failed.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Vectors of different lengths in one index.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The backend returned a different number of vectors than texts sent.
    #[error("embedder returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("no chunks to index")]
    Empty,

    /// `create` called on a store that already holds an index.
    #[error("vector store already initialized")]
    AlreadyInitialized,
}
