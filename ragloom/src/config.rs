//! Runtime settings read from the environment.
//!
//! The `config` crate fills the process environment from `.env` and the XDG
//! `config.toml` first; [`RagConfig::from_env`] then reads the keys below.
//!
//! | key | field | default |
//! |---|---|---|
//! | `MODEL` / `OPENAI_MODEL` | `model` | `gpt-4o` |
//! | `EMBEDDING_MODEL` | `embedding_model` | `text-embedding-3-small` (`hash` = offline embedder) |
//! | `CHUNK_SIZE` | `chunk_size` | 500 |
//! | `CHUNK_OVERLAP` | `chunk_overlap` | 50 |
//! | `RETRIEVER_TOP_K` | `top_k` | 4 |
//! | `AGENT_MAX_ROUNDS` | `max_rounds` | 6 |
//! | `RESPOND_STRATEGY` | `strategy` | `agentic` |
//! | `RAG_SOURCES` | `sources` (comma separated) | two blog posts |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::DEFAULT_MAX_ROUNDS;
use crate::ingest::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::retrieval::DEFAULT_TOP_K;
use crate::workflow::RespondStrategy;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
/// `EMBEDDING_MODEL` value selecting the deterministic offline embedder.
pub const HASH_EMBEDDING_MODEL: &str = "hash";

pub const DEFAULT_SOURCES: [&str; 2] = [
    "https://lilianweng.github.io/posts/2023-06-23-agent/",
    "https://lilianweng.github.io/posts/2024-04-12-diffusion-video/",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagConfig {
    pub model: String,
    pub embedding_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub max_rounds: u32,
    pub strategy: RespondStrategy,
    pub sources: Vec<String>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            max_rounds: DEFAULT_MAX_ROUNDS,
            strategy: RespondStrategy::default(),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RagConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(model) = get("MODEL").or_else(|| get("OPENAI_MODEL")) {
            config.model = model.trim().to_string();
        }
        if let Some(model) = get("EMBEDDING_MODEL") {
            config.embedding_model = model.trim().to_string();
        }
        if let Some(v) = get("CHUNK_SIZE") {
            config.chunk_size = parse_positive("CHUNK_SIZE", &v)?;
        }
        if let Some(v) = get("CHUNK_OVERLAP") {
            config.chunk_overlap = parse_number("CHUNK_OVERLAP", &v)?;
        }
        if let Some(v) = get("RETRIEVER_TOP_K") {
            config.top_k = parse_positive("RETRIEVER_TOP_K", &v)?;
        }
        if let Some(v) = get("AGENT_MAX_ROUNDS") {
            config.max_rounds = parse_positive::<u32>("AGENT_MAX_ROUNDS", &v)?;
        }
        if let Some(v) = get("RESPOND_STRATEGY") {
            config.strategy = v.parse().map_err(|reason| ConfigError::InvalidValue {
                key: "RESPOND_STRATEGY",
                value: v.clone(),
                reason,
            })?;
        }
        if let Some(v) = get("RAG_SOURCES") {
            config.sources = split_sources(&v);
        }

        if config.chunk_overlap >= config.chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "CHUNK_OVERLAP",
                value: config.chunk_overlap.to_string(),
                reason: format!("must be smaller than CHUNK_SIZE ({})", config.chunk_size),
            });
        }
        Ok(config)
    }

    /// True when the offline hash embedder is selected.
    pub fn uses_hash_embedder(&self) -> bool {
        self.embedding_model.eq_ignore_ascii_case(HASH_EMBEDDING_MODEL)
    }
}

/// Comma-separated list, entries trimmed, blanks dropped.
pub fn split_sources(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_positive<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let n = parse_number::<T>(key, value)?;
    if n == T::default() {
        return Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(n)
}
