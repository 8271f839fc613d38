//! Workflow state: the record that flows through Retrieve and Respond.
//!
//! Each stage consumes a `WorkflowState` and returns a new one built with
//! [`WorkflowState::with_chunks`] or [`WorkflowState::with_answer`]. The
//! question is fixed at construction; there is no setter for it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata key for the document origin (URL or file path).
pub const METADATA_SOURCE: &str = "source";
/// Metadata key for a human-readable document title.
pub const METADATA_TITLE: &str = "title";

/// A contiguous span of document text plus metadata; the unit of retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    /// Ordered so that formatting and serialization are deterministic.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Chunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds one metadata entry (builder).
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get(METADATA_TITLE).map(String::as_str)
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata.get(METADATA_SOURCE).map(String::as_str)
    }

    /// Title if present, else source; `None` when neither is set or both are empty.
    pub fn label(&self) -> Option<&str> {
        self.title()
            .filter(|s| !s.is_empty())
            .or_else(|| self.source().filter(|s| !s.is_empty()))
    }
}

/// State for the retrieve → respond graph.
///
/// Created by [`WorkflowState::new`] with only the question set. Retrieve
/// fills `retrieved_chunks`, Respond fills `answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    question: String,
    retrieved_chunks: Vec<Chunk>,
    answer: String,
}

impl WorkflowState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            retrieved_chunks: Vec::new(),
            answer: String::new(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn retrieved_chunks(&self) -> &[Chunk] {
        &self.retrieved_chunks
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// New state with `retrieved_chunks` replaced; question and answer carried over.
    pub fn with_chunks(self, chunks: Vec<Chunk>) -> Self {
        Self {
            retrieved_chunks: chunks,
            ..self
        }
    }

    /// New state with `answer` replaced; question and chunks carried over.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            ..self
        }
    }

    /// Splits the state into `(question, retrieved_chunks, answer)`.
    pub fn into_parts(self) -> (String, Vec<Chunk>, String) {
        (self.question, self.retrieved_chunks, self.answer)
    }
}
