//! Immutable in-memory vector index with cosine-similarity search.

use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::AgentError;
use crate::state::Chunk;

use super::{Embedder, IndexError};

/// Texts sent to the embedder per request during a build.
pub const EMBED_BATCH_SIZE: usize = 64;

/// Cosine similarity of two vectors; 0.0 when either has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

struct Entry {
    vector: Vec<f32>,
    chunk: Chunk,
}

/// Chunks and their embeddings, in insertion order. Read-only after [`VectorIndex::build`].
pub struct VectorIndex {
    entries: Vec<Entry>,
    embedder: Arc<dyn Embedder>,
}

impl VectorIndex {
    /// Embeds every chunk's content (batches run concurrently) and stores the results.
    pub async fn build(chunks: Vec<Chunk>, embedder: Arc<dyn Embedder>) -> Result<Self, IndexError> {
        if chunks.is_empty() {
            return Err(IndexError::Empty);
        }
        let batches = chunks.chunks(EMBED_BATCH_SIZE).map(|batch| {
            let embedder = Arc::clone(&embedder);
            async move {
                let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
                let vectors = embedder.embed(&texts).await?;
                if vectors.len() != texts.len() {
                    return Err(IndexError::CountMismatch {
                        expected: texts.len(),
                        actual: vectors.len(),
                    });
                }
                Ok::<_, IndexError>(vectors)
            }
        });
        let vectors: Vec<Vec<f32>> = try_join_all(batches).await?.into_iter().flatten().collect();

        let expected = vectors.first().map(Vec::len).unwrap_or_default();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        let entries = vectors
            .into_iter()
            .zip(chunks)
            .map(|(vector, chunk)| Entry { vector, chunk })
            .collect::<Vec<_>>();
        tracing::info!(chunks = entries.len(), dimension = expected, "vector index built");
        Ok(Self { entries, embedder })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `k` chunks by descending cosine similarity to `query`; ties keep insertion order.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>, AgentError> {
        let query_vec = self
            .embedder
            .embed(&[query])
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("query embedding: {}", e)))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AgentError::ExecutionFailed("query embedding: no vector returned".to_string())
            })?;

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(&query_vec, &e.vector)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let hits: Vec<Chunk> = scored
            .into_iter()
            .take(k)
            .map(|(i, _)| self.entries[i].chunk.clone())
            .collect();
        tracing::debug!(k, hits = hits.len(), "vector search");
        Ok(hits)
    }
}
