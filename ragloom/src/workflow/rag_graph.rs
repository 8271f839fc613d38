//! The retrieve → respond workflow graph.

use std::sync::Arc;

use crate::agent::DEFAULT_MAX_ROUNDS;
use crate::error::AgentError;
use crate::graph::{CompiledStateGraph, LoggingNodeMiddleware, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::retrieval::{Retriever, DEFAULT_TOP_K};
use crate::state::WorkflowState;
use crate::tools::ToolRegistry;

use super::respond_node::AgentSlot;
use super::{RespondNode, RespondStrategy, RetrieveNode};

/// Builder for [`RagGraph`].
pub struct RagGraphBuilder {
    retriever: Arc<dyn Retriever>,
    llm: Arc<dyn LlmClient>,
    strategy: RespondStrategy,
    top_k: usize,
    max_rounds: u32,
    tools: Option<Arc<ToolRegistry>>,
}

impl RagGraphBuilder {
    pub fn strategy(mut self, strategy: RespondStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Chunks fetched by the Retrieve stage; 0 means [`DEFAULT_TOP_K`].
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = if k == 0 { DEFAULT_TOP_K } else { k };
        self
    }

    /// Agent round budget (agentic strategy only).
    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Tool set for the agent. Without one, the default set over the graph's
    /// retriever is built when the agent is first needed.
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Wires `START → retrieve → respond → END` and compiles it.
    pub fn build(self) -> Result<RagGraph, AgentError> {
        let retrieve = RetrieveNode::new(Arc::clone(&self.retriever), self.top_k);
        let respond = match self.strategy {
            RespondStrategy::Direct => RespondNode::direct(Arc::clone(&self.llm)),
            RespondStrategy::Agentic => RespondNode::agentic(AgentSlot::new(
                Arc::clone(&self.llm),
                Arc::clone(&self.retriever),
                self.tools,
                self.max_rounds,
            )),
        };

        let mut graph = StateGraph::<WorkflowState>::new();
        graph
            .add_node("retrieve", Arc::new(retrieve))
            .add_node("respond", Arc::new(respond))
            .add_edge(START, "retrieve")
            .add_edge("retrieve", "respond")
            .add_edge("respond", END);
        let graph = graph
            .with_middleware(Arc::new(LoggingNodeMiddleware::<WorkflowState>::default()))
            .compile()
            .map_err(|e| AgentError::ExecutionFailed(format!("workflow graph: {}", e)))?;

        Ok(RagGraph {
            graph,
            strategy: self.strategy,
            top_k: self.top_k,
        })
    }
}

/// Retrieve-then-respond pipeline.
///
/// Immutable after build; every [`RagGraph::run`] owns its own
/// [`WorkflowState`], so one graph can answer concurrent questions.
pub struct RagGraph {
    graph: CompiledStateGraph<WorkflowState>,
    strategy: RespondStrategy,
    top_k: usize,
}

impl std::fmt::Debug for RagGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagGraph")
            .field("nodes", &self.graph.node_order())
            .field("strategy", &self.strategy)
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl RagGraph {
    pub fn builder(retriever: Arc<dyn Retriever>, llm: Arc<dyn LlmClient>) -> RagGraphBuilder {
        RagGraphBuilder {
            retriever,
            llm,
            strategy: RespondStrategy::default(),
            top_k: DEFAULT_TOP_K,
            max_rounds: DEFAULT_MAX_ROUNDS,
            tools: None,
        }
    }

    pub fn strategy(&self) -> RespondStrategy {
        self.strategy
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Node ids in execution order.
    pub fn node_order(&self) -> &[String] {
        self.graph.node_order()
    }

    /// Answers `question`. The first stage error is returned unchanged; no
    /// partial state is produced.
    pub async fn run(&self, question: &str) -> Result<WorkflowState, AgentError> {
        tracing::info!(strategy = %self.strategy, "workflow run");
        self.graph.invoke(WorkflowState::new(question)).await
    }
}
