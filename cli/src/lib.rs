//! Front end for ragloom: initialize the pipeline once, ask questions, render answers.
//!
//! The binary (`ragloom`) parses flags and handles I/O; this library holds the
//! parts worth testing: option merging ([`apply_options`]), one question
//! ([`ask`]), rendering ([`display`]) and the recent-search list ([`History`]).

pub mod display;
mod history;

pub use history::{History, HistoryEntry, HISTORY_SHOWN};

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use ragloom::{AgentError, Chunk, ConfigError, RagConfig, RagError, RagSystem, RespondStrategy};

/// CLI-level failure. Initialization failures are kept apart from failures
/// answering one question so they can be reported differently.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("load config files: {0}")]
    ConfigFiles(#[from] config::LoadError),

    #[error("Failed to initialize: {0}")]
    Init(RagError),

    #[error("error: {0}")]
    Run(AgentError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<RagError> for RunError {
    fn from(e: RagError) -> Self {
        match e {
            RagError::Run(inner) => RunError::Run(inner),
            other => RunError::Init(other),
        }
    }
}

impl RunError {
    /// Process exit code: 2 when the system never became ready, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Init(_) | RunError::Config(_) | RunError::ConfigFiles(_) => 2,
            _ => 1,
        }
    }
}

/// Command-line overrides applied on top of [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub strategy: Option<RespondStrategy>,
    /// Replaces the configured sources when non-empty.
    pub sources: Vec<String>,
    pub verbose: bool,
    pub output_json: bool,
}

/// `config` with the flags in `opts` applied.
pub fn apply_options(mut config: RagConfig, opts: &RunOptions) -> RagConfig {
    if let Some(strategy) = opts.strategy {
        config.strategy = strategy;
    }
    if !opts.sources.is_empty() {
        config.sources = opts.sources.clone();
    }
    config
}

/// One answered question.
#[derive(Debug, Clone, Serialize)]
pub struct AskResult {
    pub question: String,
    pub answer: String,
    pub retrieved_chunks: Vec<Chunk>,
    #[serde(rename = "elapsed_secs", serialize_with = "secs")]
    pub elapsed: Duration,
}

fn secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Runs `question` through `system` and times it.
pub async fn ask(system: &RagSystem, question: &str) -> Result<AskResult, RunError> {
    let start = Instant::now();
    let state = system.run(question).await?;
    let elapsed = start.elapsed();
    let (question, retrieved_chunks, answer) = state.into_parts();
    tracing::info!(
        chunks = retrieved_chunks.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "question answered"
    );
    Ok(AskResult {
        question,
        answer,
        retrieved_chunks,
        elapsed,
    })
}
