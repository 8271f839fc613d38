//! # Ragloom
//!
//! Retrieval-augmented question answering on a small state graph. A question
//! flows through two stages, **retrieve** then **respond**, as one immutable
//! [`WorkflowState`] value that each stage replaces.
//!
//! The respond stage has two strategies:
//!
//! - **Direct** ([`RespondStrategy::Direct`]): one prompt built from the retrieved
//!   chunks and the question, sent to the [`LlmClient`].
//! - **Agentic** ([`RespondStrategy::Agentic`]): a bounded think → act → observe
//!   [`ReasoningAgent`] that calls tools from a [`ToolRegistry`] (the corpus
//!   `retriever` and `wikipedia`) and falls back to
//!   [`FALLBACK_ANSWER`] when it cannot finish.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`]: the engine both pipelines run on.
//! - [`workflow`]: [`RagGraph`], [`RetrieveNode`], [`RespondNode`], [`build_direct_prompt`].
//! - [`agent`]: [`ReasoningAgent`], [`ThinkNode`], [`ActNode`], [`ObserveNode`], [`tools_condition`].
//! - [`tools`]: [`Tool`], [`ToolRegistry`], [`CorpusTool`], [`WikipediaTool`], [`build_tools`].
//! - [`retrieval`]: [`Retriever`] port and [`StaticRetriever`].
//! - [`llm`]: [`LlmClient`] port, [`ChatOpenAI`], [`MockLlm`].
//! - [`index`]: [`VectorIndex`], [`VectorStore`], [`Embedder`] implementations.
//! - [`ingest`]: [`SourceKind`], [`DocumentLoader`], [`TextSplitter`], [`DocumentProcessor`].
//! - [`config`]: [`RagConfig`] from environment variables.
//! - [`app`]: [`RagSystem`], the once-initialized pipeline a front end holds.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ragloom::{Chunk, MockLlm, RagGraph, RespondStrategy, StaticRetriever};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), ragloom::AgentError> {
//! let retriever = Arc::new(StaticRetriever::new(vec![Chunk::new("Paris is the capital of France.")]));
//! let llm = Arc::new(MockLlm::with_no_tool_calls("Paris."));
//! let graph = RagGraph::builder(retriever, llm)
//!     .strategy(RespondStrategy::Direct)
//!     .build()?;
//! let state = graph.run("What is the capital of France?").await?;
//! assert_eq!(state.answer(), "Paris.");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod app;
pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod message;
pub mod retrieval;
pub mod state;
pub mod tool_source;
pub mod tools;
pub mod workflow;

pub use agent::{
    tools_condition, ActNode, HandleToolErrors, ObserveNode, ReasoningAgent, ThinkNode,
    ToolsConditionResult, AGENT_SYSTEM_PROMPT, DEFAULT_MAX_ROUNDS, FALLBACK_ANSWER,
};
pub use app::{Initialized, RagError, RagSystem};
pub use config::{ConfigError, RagConfig};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, LoggingNodeMiddleware, Next, Node, NodeMiddleware,
    StateGraph, END, START,
};
pub use index::{
    Embedder, HashEmbedder, IndexError, OpenAIEmbedder, VectorIndex, VectorStore,
    VectorStoreRetriever,
};
pub use ingest::{
    Document, DocumentLoader, DocumentProcessor, IngestError, SourceKind, TextSplitter,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, ToolChoiceMode};
pub use message::Message;
pub use retrieval::{Retriever, StaticRetriever, DEFAULT_TOP_K};
pub use state::{Chunk, ReActState, ToolCall, ToolResult, WorkflowState};
pub use tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{
    build_tools, build_tools_with, CorpusTool, Tool, ToolRegistry, WikipediaTool,
    NO_DOCUMENTS_FOUND,
};
pub use workflow::{build_direct_prompt, RagGraph, RespondNode, RespondStrategy, RetrieveNode};
