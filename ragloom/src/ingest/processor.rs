//! Load + split in one step.

use crate::state::Chunk;

use super::{DocumentLoader, IngestError, TextSplitter};

/// Loads sources and splits them into chunks, preserving source order.
#[derive(Default)]
pub struct DocumentProcessor {
    loader: DocumentLoader,
    splitter: TextSplitter,
}

impl DocumentProcessor {
    /// Processor with the default loader and a splitter of the given size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, IngestError> {
        Ok(Self {
            loader: DocumentLoader::new(),
            splitter: TextSplitter::new(chunk_size, chunk_overlap)?,
        })
    }

    pub fn with_parts(loader: DocumentLoader, splitter: TextSplitter) -> Self {
        Self { loader, splitter }
    }

    pub fn splitter(&self) -> &TextSplitter {
        &self.splitter
    }

    pub async fn process(&self, sources: &[String]) -> Result<Vec<Chunk>, IngestError> {
        let docs = self.loader.load(sources).await?;
        let chunks = self.splitter.split_documents(&docs);
        tracing::info!(
            documents = docs.len(),
            chunks = chunks.len(),
            chunk_size = self.splitter.chunk_size(),
            "documents split"
        );
        Ok(chunks)
    }
}
