//! OpenAI Embeddings implementation of [`Embedder`].
//!
//! Requires `OPENAI_API_KEY` (or a custom [`OpenAIConfig`]). Default model in
//! the pipeline is `text-embedding-3-small`.

use async_openai::{
    config::OpenAIConfig,
    types::embeddings::{CreateEmbeddingRequest, EmbeddingInput},
    Client,
};
use async_trait::async_trait;

use super::{Embedder, IndexError};

/// OpenAI embeddings client.
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Embedder with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Embedder with a custom API key or base URL.
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        let model = model.into();
        let dimensions = Self::model_dimensions(&model);
        Self {
            client: Client::with_config(config),
            model,
            dimensions,
        }
    }

    /// Known output sizes; unknown models are assumed to match `text-embedding-3-small`.
    fn model_dimensions(model: &str) -> usize {
        match model {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, IndexError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let input = match texts {
            [one] => EmbeddingInput::String((*one).to_string()),
            many => EmbeddingInput::StringArray(many.iter().map(|s| s.to_string()).collect()),
        };
        let request = CreateEmbeddingRequest {
            input,
            model: self.model.clone(),
            ..Default::default()
        };

        tracing::debug!(model = %self.model, count = texts.len(), "OpenAI embeddings create");
        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| IndexError::Embedding(format!("OpenAI API error: {}", e)))?;

        let mut data = response.data;
        data.sort_by_key(|e| e.index);
        if data.len() != texts.len() {
            return Err(IndexError::CountMismatch {
                expected: texts.len(),
                actual: data.len(),
            });
        }
        Ok(data.into_iter().map(|e| e.embedding).collect())
    }

    fn dimension(&self) -> usize {
        self.dimensions
    }
}
