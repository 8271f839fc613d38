//! Embedder trait plus a deterministic hashing embedder for offline use.

use async_trait::async_trait;

use super::IndexError;

/// Produces fixed-size float vectors from text.
///
/// Used by [`VectorIndex`](super::VectorIndex) for chunk contents at build time
/// and for the query at search time.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IndexError>;

    /// Length of every vector returned by [`Embedder::embed`].
    fn dimension(&self) -> usize;
}

/// Bag-of-words embedder: each lowercase alphanumeric token is hashed into one
/// of `dimension` buckets.
///
/// Deterministic across runs and platforms (FNV-1a), so texts sharing words
/// score higher under cosine similarity. No network, no model.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for b in token.bytes() {
            hash ^= u64::from(b);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        (hash % self.dimension as u64) as usize
    }

    fn text_to_vec(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            v[self.bucket(&token.to_lowercase())] += 1.0;
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IndexError> {
        Ok(texts.iter().map(|t| self.text_to_vec(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Same text gives the same vector; case and punctuation are ignored.
    #[tokio::test]
    async fn hash_embedder_is_deterministic_and_case_insensitive() {
        let e = HashEmbedder::new(32);
        let v = e.embed(&["Paris, France", "paris france", "Berlin"]).await.unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], v[1]);
        assert_ne!(v[0], v[2]);
        assert_eq!(v[0].len(), 32);
        assert_eq!(v[0].iter().sum::<f32>(), 2.0);
    }

    /// **Scenario**: Empty text embeds to the zero vector.
    #[tokio::test]
    async fn empty_text_is_zero_vector() {
        let e = HashEmbedder::default();
        let v = e.embed(&[""]).await.unwrap();
        assert!(v[0].iter().all(|x| *x == 0.0));
        assert_eq!(e.dimension(), 256);
    }
}
