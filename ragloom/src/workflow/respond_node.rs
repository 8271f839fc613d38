//! Respond stage: direct generation from the retrieved context, or the reasoning agent.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;

use crate::agent::ReasoningAgent;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::retrieval::Retriever;
use crate::state::{Chunk, WorkflowState};
use crate::tools::{build_tools, ToolRegistry};

/// How the Respond stage produces the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondStrategy {
    /// One prompt built from the retrieved chunks and the question.
    Direct,
    /// Delegate to the reasoning agent, which retrieves through its tools.
    #[default]
    Agentic,
}

impl RespondStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Agentic => "agentic",
        }
    }
}

impl std::fmt::Display for RespondStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RespondStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "agentic" | "agent" => Ok(Self::Agentic),
            _ => Err(format!(
                "unknown respond strategy: {} (use direct or agentic)",
                s
            )),
        }
    }
}

/// Prompt for the direct strategy.
///
/// Context is the chunk contents in retrieval order joined by a blank line;
/// with no chunks the context block is empty. The output depends only on
/// the inputs.
pub fn build_direct_prompt(question: &str, chunks: &[Chunk]) -> String {
    let context = chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "Answer the question based on the context.\n\nContext:\n{}\n\nQuestion: {}",
        context, question
    )
}

/// Agent wiring built on first use.
pub(crate) struct AgentSlot {
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn Retriever>,
    tools: Option<Arc<ToolRegistry>>,
    max_rounds: u32,
    agent: OnceCell<ReasoningAgent>,
}

impl AgentSlot {
    pub(crate) fn new(
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn Retriever>,
        tools: Option<Arc<ToolRegistry>>,
        max_rounds: u32,
    ) -> Self {
        Self {
            llm,
            retriever,
            tools,
            max_rounds,
            agent: OnceCell::new(),
        }
    }

    /// The agent, built at most once even under concurrent first use.
    fn get(&self) -> Result<&ReasoningAgent, AgentError> {
        self.agent.get_or_try_init(|| {
            let tools = match &self.tools {
                Some(tools) => Arc::clone(tools),
                None => Arc::new(
                    build_tools(Arc::clone(&self.retriever))
                        .map_err(|e| AgentError::ExecutionFailed(format!("tool set: {}", e)))?,
                ),
            };
            tracing::info!(tools = ?tools.names(), max_rounds = self.max_rounds, "building reasoning agent");
            ReasoningAgent::builder(Arc::clone(&self.llm), tools)
                .max_rounds(self.max_rounds)
                .build()
        })
    }
}

enum Responder {
    Direct(Arc<dyn LlmClient>),
    Agentic(AgentSlot),
}

/// Sets `answer`; question and retrieved chunks are carried over.
///
/// Direct: model failures propagate. Agentic: the agent never fails, it
/// falls back to [`FALLBACK_ANSWER`](crate::agent::FALLBACK_ANSWER).
pub struct RespondNode {
    responder: Responder,
}

impl RespondNode {
    pub fn direct(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            responder: Responder::Direct(llm),
        }
    }

    pub(crate) fn agentic(slot: AgentSlot) -> Self {
        Self {
            responder: Responder::Agentic(slot),
        }
    }

    pub fn strategy(&self) -> RespondStrategy {
        match self.responder {
            Responder::Direct(_) => RespondStrategy::Direct,
            Responder::Agentic(_) => RespondStrategy::Agentic,
        }
    }
}

#[async_trait]
impl Node<WorkflowState> for RespondNode {
    fn id(&self) -> &str {
        "respond"
    }

    async fn run(&self, state: WorkflowState) -> Result<(WorkflowState, Next), AgentError> {
        let answer = match &self.responder {
            Responder::Direct(llm) => {
                let prompt = build_direct_prompt(state.question(), state.retrieved_chunks());
                llm.complete(&prompt).await?
            }
            Responder::Agentic(slot) => slot.get()?.run(state.question()).await,
        };
        Ok((state.with_answer(answer), Next::End))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::FALLBACK_ANSWER;
    use crate::llm::MockLlm;
    use crate::retrieval::StaticRetriever;

    #[test]
    fn direct_prompt_layout() {
        let chunks = vec![Chunk::new("first"), Chunk::new("second")];
        assert_eq!(
            build_direct_prompt("Why?", &chunks),
            "Answer the question based on the context.\n\nContext:\nfirst\n\nsecond\n\nQuestion: Why?"
        );
        assert_eq!(
            build_direct_prompt("Why?", &[]),
            "Answer the question based on the context.\n\nContext:\n\n\nQuestion: Why?"
        );
    }

    #[test]
    fn strategy_parse_and_display() {
        assert_eq!("Direct".parse::<RespondStrategy>(), Ok(RespondStrategy::Direct));
        assert_eq!(" agentic ".parse::<RespondStrategy>(), Ok(RespondStrategy::Agentic));
        assert!("hybrid".parse::<RespondStrategy>().is_err());
        assert_eq!(RespondStrategy::default().to_string(), "agentic");
    }

    /// **Scenario**: Direct respond sets the model text verbatim.
    #[tokio::test]
    async fn direct_sets_answer_verbatim() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("  Paris.\n"));
        let node = RespondNode::direct(llm.clone());
        let state = WorkflowState::new("Capital?").with_chunks(vec![Chunk::new("Paris.")]);
        let (out, next) = node.run(state).await.unwrap();
        assert_eq!(out.answer(), "  Paris.\n");
        assert_eq!(out.retrieved_chunks().len(), 1);
        assert_eq!(next, Next::End);
        assert_eq!(llm.call_count(), 1);
    }

    /// **Scenario**: Direct respond propagates a generation failure.
    #[tokio::test]
    async fn direct_propagates_generation_failure() {
        let node = RespondNode::direct(Arc::new(MockLlm::failing("rate limited")));
        let err = node.run(WorkflowState::new("q")).await.unwrap_err();
        assert!(err.is_generation(), "{}", err);
    }

    /// **Scenario**: Agentic respond turns a generation failure into the fallback answer.
    #[tokio::test]
    async fn agentic_falls_back_on_generation_failure() {
        let slot = AgentSlot::new(
            Arc::new(MockLlm::failing("timeout")),
            Arc::new(StaticRetriever::empty()),
            Some(Arc::new(ToolRegistry::new())),
            3,
        );
        let node = RespondNode::agentic(slot);
        assert_eq!(node.strategy(), RespondStrategy::Agentic);
        let (out, _) = node.run(WorkflowState::new("q")).await.unwrap();
        assert_eq!(out.answer(), FALLBACK_ANSWER);
    }
}
