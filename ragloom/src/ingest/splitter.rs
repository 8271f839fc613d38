//! Recursive character splitter.
//!
//! Text is cut on the first separator (in priority order) that occurs in it;
//! pieces still longer than the chunk size are cut again with the remaining
//! separators, and short pieces are merged back up to the chunk size with the
//! configured overlap carried between neighbours. Lengths are in characters.

use crate::state::Chunk;

use super::{Document, IngestError};

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TextSplitter {
    /// Fails when `chunk_size` is 0 or `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, IngestError> {
        if chunk_size == 0 {
            return Err(IngestError::InvalidSplitter(
                "chunk size must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(IngestError::InvalidSplitter(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        })
    }

    /// Replaces the separator list. An empty string, if present, splits into characters.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits `text` into trimmed, non-empty pieces of at most `chunk_size`
    /// characters (a piece can only be longer when no separator applies).
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// Splits every document; each chunk inherits its document's metadata.
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Chunk> {
        docs.iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .map(move |content| Chunk {
                        content,
                        metadata: doc.metadata.clone(),
                    })
            })
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // First separator present in the text; "" always applies.
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut rest: &[String] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = "";
                break;
            }
            if text.contains(sep.as_str()) {
                separator = sep.as_str();
                rest = &separators[i + 1..];
                break;
            }
        }

        let mut out = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }
            if !pending.is_empty() {
                out.extend(self.merge(&pending));
                pending.clear();
            }
            if rest.is_empty() {
                out.push(piece.trim().to_string());
            } else {
                out.extend(self.split_recursive(&piece, rest));
            }
        }
        if !pending.is_empty() {
            out.extend(self.merge(&pending));
        }
        out.retain(|s| !s.is_empty());
        out
    }

    /// Greedily joins pieces up to `chunk_size`, starting each new chunk with
    /// the tail of the previous one (at most `chunk_overlap` characters).
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut window: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                push_joined(&mut docs, &window);
                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }
            window.push_back(piece);
            total += len;
        }
        push_joined(&mut docs, &window);
        docs
    }
}

fn push_joined(docs: &mut Vec<String>, window: &std::collections::VecDeque<&str>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        docs.push(trimmed.to_string());
    }
}

/// Splits on `separator`, keeping it at the start of each following piece.
/// An empty separator yields single characters.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }
    let mut pieces = Vec::new();
    let mut parts = text.split(separator);
    if let Some(first) = parts.next() {
        if !first.is_empty() {
            pieces.push(first.to_string());
        }
    }
    for part in parts {
        pieces.push(format!("{}{}", separator, part));
    }
    pieces
}
