//! Ingestion collaborator: turn sources into chunks ready for indexing.
//!
//! Each source is classified once by [`SourceKind::classify`] (URL, directory
//! of `.txt` files, or one `.txt` file); anything else fails with
//! [`IngestError::UnsupportedSource`] and is never skipped silently.
//! [`DocumentLoader`] reads the sources, [`TextSplitter`] cuts documents into
//! overlapping chunks, and [`DocumentProcessor`] runs both.

mod loader;
mod processor;
mod splitter;

pub use loader::{html_to_text, html_title, DocumentLoader};
pub use processor::DocumentProcessor;
pub use splitter::{TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while loading or splitting sources.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported source type: {0}. Use URL, .txt file, or directory of .txt files.")]
    UnsupportedSource(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("invalid splitter settings: {0}")]
    InvalidSplitter(String),
}

/// A loaded source before splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub content: String,
    /// Always has `source`; web pages also carry `title` when the page has one.
    pub metadata: BTreeMap<String, String>,
}

/// What a source string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// `http://` or `https://` address.
    Url(String),
    /// Existing directory; its `.txt` files are read.
    Directory(PathBuf),
    /// Existing file ending in `.txt` (any case).
    TextFile(PathBuf),
}

impl SourceKind {
    /// Classifies `source`. Exactly one branch applies; there is no fallthrough.
    pub fn classify(source: &str) -> Result<Self, IngestError> {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Self::Url(trimmed.to_string()));
        }
        let path = Path::new(trimmed);
        if path.is_dir() {
            return Ok(Self::Directory(path.to_path_buf()));
        }
        if path.is_file() && has_txt_extension(path) {
            return Ok(Self::TextFile(path.to_path_buf()));
        }
        Err(IngestError::UnsupportedSource(source.to_string()))
    }
}

pub(crate) fn has_txt_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}
