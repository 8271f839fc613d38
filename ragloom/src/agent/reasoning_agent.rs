//! Bounded think → act → observe agent over a tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AgentError;
use crate::graph::{CompiledStateGraph, LoggingNodeMiddleware, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::state::ReActState;
use crate::tools::ToolRegistry;

use super::{tools_condition, ActNode, HandleToolErrors, ObserveNode, ThinkNode};

/// Answer returned when the agent ends without a usable reply.
pub const FALLBACK_ANSWER: &str = "Could not generate answer.";

/// Think/act rounds allowed per question unless configured otherwise.
pub const DEFAULT_MAX_ROUNDS: u32 = 6;

/// System instruction setting the tool-preference policy.
pub const AGENT_SYSTEM_PROMPT: &str = "You are a helpful RAG agent. Prefer 'retriever' for user-provided docs; use 'wikipedia' for general knowledge. Return only the final useful answer.";

/// Builder for [`ReasoningAgent`].
pub struct ReasoningAgentBuilder {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    max_rounds: u32,
    system_prompt: String,
    handle_tool_errors: HandleToolErrors,
}

impl ReasoningAgentBuilder {
    /// Maximum think → act → observe rounds; 0 is treated as 1.
    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn handle_tool_errors(mut self, handle: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle;
        self
    }

    /// Compiles the agent graph:
    ///
    /// ```text
    /// START → think ─(tools)→ act → observe ─→ think
    ///           └──(no tools)→ END      └─(budget used)→ END
    /// ```
    pub fn build(self) -> Result<ReasoningAgent, AgentError> {
        let think = ThinkNode::new(Arc::clone(&self.llm), self.tools.list());
        let act = ActNode::new(self.tools.clone()).with_handle_tool_errors(self.handle_tool_errors);
        let observe = ObserveNode::new(self.max_rounds);

        let path_map: HashMap<String, String> = [
            ("tools".to_string(), "act".to_string()),
            (END.to_string(), END.to_string()),
        ]
        .into_iter()
        .collect();

        let mut graph = StateGraph::<ReActState>::new();
        graph
            .add_node("think", Arc::new(think))
            .add_node("act", Arc::new(act))
            .add_node("observe", Arc::new(observe))
            .add_edge(START, "think")
            .add_conditional_edges(
                "think",
                Arc::new(|state: &ReActState| tools_condition(state).as_str().to_string()),
                Some(path_map),
            )
            .add_edge("act", "observe")
            .add_edge("observe", "think");

        // Every round is three node runs, plus the final think.
        let limit = 3 * self.max_rounds as usize + 2;
        let graph = graph
            .with_middleware(Arc::new(LoggingNodeMiddleware::<ReActState>::default()))
            .with_recursion_limit(limit)
            .compile()
            .map_err(|e| AgentError::ExecutionFailed(format!("agent graph: {}", e)))?;

        Ok(ReasoningAgent {
            graph,
            system_prompt: self.system_prompt,
            max_rounds: self.max_rounds,
        })
    }
}

/// Tool-calling agent with a fixed round budget.
///
/// Holds only immutable wiring; each [`ReasoningAgent::run`] starts from a
/// fresh [`ReActState`], so one agent can serve concurrent questions.
pub struct ReasoningAgent {
    graph: CompiledStateGraph<ReActState>,
    system_prompt: String,
    max_rounds: u32,
}

impl ReasoningAgent {
    pub fn builder(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>) -> ReasoningAgentBuilder {
        ReasoningAgentBuilder {
            llm,
            tools,
            max_rounds: DEFAULT_MAX_ROUNDS,
            system_prompt: AGENT_SYSTEM_PROMPT.to_string(),
            handle_tool_errors: HandleToolErrors::default(),
        }
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Runs one session and returns its final state. Errors are those of the
    /// underlying nodes (generation failure, propagated tool failure).
    pub async fn run_session(&self, question: &str) -> Result<ReActState, AgentError> {
        let state = ReActState::seeded(Some(&self.system_prompt), question);
        self.graph.invoke(state).await
    }

    /// Answers `question`.
    ///
    /// The answer is the session's last message when it is a non-empty
    /// assistant reply. Anything else (budget exhausted on an observation,
    /// empty reply, generation failure) yields [`FALLBACK_ANSWER`].
    pub async fn run(&self, question: &str) -> String {
        match self.run_session(question).await {
            Ok(state) => match state.final_answer() {
                Some(answer) => answer.to_string(),
                None => {
                    tracing::warn!(
                        rounds = state.turn_count,
                        "agent ended without a final answer, using fallback"
                    );
                    FALLBACK_ANSWER.to_string()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "agent run failed, using fallback");
                FALLBACK_ANSWER.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{query_call, MockLlm};
    use crate::message::Message;
    use crate::retrieval::StaticRetriever;
    use crate::state::Chunk;
    use crate::tools::{CorpusTool, Tool};

    fn corpus_only(chunks: Vec<Chunk>) -> Arc<ToolRegistry> {
        Arc::new(
            ToolRegistry::from_tools([
                Arc::new(CorpusTool::new(Arc::new(StaticRetriever::new(chunks)))) as Arc<dyn Tool>,
            ])
            .unwrap(),
        )
    }

    /// **Scenario**: A direct answer with no tool call ends after one think.
    #[tokio::test]
    async fn direct_answer_without_tools() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("Paris."));
        let agent = ReasoningAgent::builder(llm.clone(), corpus_only(vec![]))
            .build()
            .unwrap();
        assert_eq!(agent.run("Capital of France?").await, "Paris.");
        assert_eq!(llm.call_count(), 1);
        let recorded = llm.recorded_messages();
        let first = &recorded[0];
        assert_eq!(first[0], Message::system(AGENT_SYSTEM_PROMPT));
        assert_eq!(first[1], Message::user("Capital of France?"));
        assert_eq!(first.len(), 2);
    }

    /// **Scenario**: Tool call, observation, then final answer.
    #[tokio::test]
    async fn tool_round_then_answer() {
        let llm = Arc::new(MockLlm::first_tools_then_end(
            query_call("retriever", "capital of France", "c1"),
            "Paris is the capital.",
        ));
        let agent = ReasoningAgent::builder(
            llm.clone(),
            corpus_only(vec![Chunk::new("Paris is the capital of France.")]),
        )
        .build()
        .unwrap();
        let state = agent.run_session("Capital?").await.unwrap();
        assert_eq!(state.final_answer(), Some("Paris is the capital."));
        assert_eq!(state.turn_count, 1);
        assert!(llm.recorded_prompts()[1]
            .starts_with("Tool retriever returned: [1] doc_1\nParis is the capital of France."));
    }

    /// **Scenario**: Every round requests a tool; budget 3 ends with the fallback.
    #[tokio::test]
    async fn budget_exhaustion_returns_fallback() {
        let llm = Arc::new(MockLlm::always_tool_call(query_call("retriever", "q", "c")));
        let agent = ReasoningAgent::builder(llm.clone(), corpus_only(vec![]))
            .max_rounds(3)
            .build()
            .unwrap();
        assert_eq!(agent.run("q").await, FALLBACK_ANSWER);
        assert_eq!(llm.call_count(), 3);
    }

    /// **Scenario**: Generation failure inside the loop yields the fallback, not an error.
    #[tokio::test]
    async fn generation_failure_returns_fallback() {
        let agent = ReasoningAgent::builder(Arc::new(MockLlm::failing("503")), corpus_only(vec![]))
            .build()
            .unwrap();
        assert_eq!(agent.run("q").await, FALLBACK_ANSWER);
    }

    /// **Scenario**: An empty final reply yields the fallback.
    #[tokio::test]
    async fn empty_reply_returns_fallback() {
        let agent = ReasoningAgent::builder(
            Arc::new(MockLlm::with_no_tool_calls("")),
            corpus_only(vec![]),
        )
        .build()
        .unwrap();
        assert_eq!(agent.run("q").await, FALLBACK_ANSWER);
    }

    /// **Scenario**: Unknown tool is an error observation; the agent still answers.
    #[tokio::test]
    async fn unknown_tool_is_observed_not_raised() {
        let llm = Arc::new(MockLlm::first_tools_then_end(
            query_call("calculator", "1+1", "c1"),
            "2",
        ));
        let agent = ReasoningAgent::builder(llm.clone(), corpus_only(vec![]))
            .build()
            .unwrap();
        assert_eq!(agent.run("1+1?").await, "2");
        assert!(llm.recorded_prompts()[1].contains("tool not found: calculator"));
    }
}
