//! Application assembly: ingest, index and build the workflow exactly once.
//!
//! [`RagSystem`] is the handle a front end holds. The first call to
//! [`RagSystem::initialize`] (or [`RagSystem::run`]) loads the sources,
//! builds the vector store and compiles the graph; concurrent first callers
//! wait for that single initialization and later callers reuse it.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::{ConfigError, RagConfig};
use crate::error::AgentError;
use crate::index::{Embedder, HashEmbedder, IndexError, OpenAIEmbedder, VectorStore};
use crate::ingest::{DocumentProcessor, IngestError};
use crate::llm::{ChatOpenAI, LlmClient};
use crate::retrieval::Retriever;
use crate::state::WorkflowState;
use crate::tools::ToolRegistry;
use crate::workflow::RagGraph;

/// Failure of the application layer.
///
/// Everything except [`RagError::Run`] means the system never became ready.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("ingestion: {0}")]
    Ingest(#[from] IngestError),

    #[error("indexing: {0}")]
    Index(#[from] IndexError),

    #[error("workflow setup: {0}")]
    Setup(AgentError),

    #[error(transparent)]
    Run(AgentError),
}

impl RagError {
    /// True when the system failed to initialize (as opposed to failing one question).
    pub fn is_initialization(&self) -> bool {
        !matches!(self, RagError::Run(_))
    }
}

/// Ready-to-query state produced by initialization.
pub struct Initialized {
    graph: RagGraph,
    num_chunks: usize,
}

impl Initialized {
    pub fn graph(&self) -> &RagGraph {
        &self.graph
    }

    /// Chunks indexed from the configured sources.
    pub fn num_chunks(&self) -> usize {
        self.num_chunks
    }
}

/// Lazily initialized RAG pipeline.
pub struct RagSystem {
    config: RagConfig,
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn Embedder>,
    processor: Option<DocumentProcessor>,
    tools: Option<Arc<ToolRegistry>>,
    ready: OnceCell<Initialized>,
}

impl RagSystem {
    pub fn new(config: RagConfig, llm: Arc<dyn LlmClient>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            config,
            llm,
            embedder,
            processor: None,
            tools: None,
            ready: OnceCell::new(),
        }
    }

    /// OpenAI chat model and embedder named by `config` (or the hash embedder
    /// when `embedding_model` is `hash`). The API key is read from `OPENAI_API_KEY`.
    pub fn from_config(config: RagConfig) -> Self {
        let llm: Arc<dyn LlmClient> = Arc::new(ChatOpenAI::new(config.model.clone()));
        let embedder: Arc<dyn Embedder> = if config.uses_hash_embedder() {
            Arc::new(HashEmbedder::default())
        } else {
            Arc::new(OpenAIEmbedder::new(config.embedding_model.clone()))
        };
        Self::new(config, llm, embedder)
    }

    /// Replaces the document processor (default: built from the config's chunk settings).
    pub fn with_processor(mut self, processor: DocumentProcessor) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Tool set handed to the agent instead of the default one.
    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.ready.initialized()
    }

    /// Ingests, indexes and builds the graph on first call; later calls return
    /// the same instance. A failed attempt leaves the system uninitialized.
    pub async fn initialize(&self) -> Result<&Initialized, RagError> {
        self.ready.get_or_try_init(|| self.build()).await
    }

    /// Answers `question`, initializing first if needed.
    pub async fn run(&self, question: &str) -> Result<WorkflowState, RagError> {
        let ready = self.initialize().await?;
        ready.graph.run(question).await.map_err(RagError::Run)
    }

    async fn build(&self) -> Result<Initialized, RagError> {
        tracing::info!(sources = self.config.sources.len(), "initializing rag system");
        let chunks = match &self.processor {
            Some(p) => p.process(&self.config.sources).await?,
            None => {
                DocumentProcessor::new(self.config.chunk_size, self.config.chunk_overlap)?
                    .process(&self.config.sources)
                    .await?
            }
        };

        let store = Arc::new(VectorStore::new(Arc::clone(&self.embedder)));
        let num_chunks = store.create(chunks).await?;
        let retriever: Arc<dyn Retriever> = Arc::new(store.retriever(self.config.top_k));

        let mut builder = RagGraph::builder(retriever, Arc::clone(&self.llm))
            .strategy(self.config.strategy)
            .top_k(self.config.top_k)
            .max_rounds(self.config.max_rounds);
        if let Some(tools) = &self.tools {
            builder = builder.tools(Arc::clone(tools));
        }
        let graph = builder.build().map_err(RagError::Setup)?;

        tracing::info!(chunks = num_chunks, strategy = %graph.strategy(), "rag system ready");
        Ok(Initialized { graph, num_chunks })
    }
}
