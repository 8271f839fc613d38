//! Agentic strategy: the respond stage delegates to the reasoning agent and its tools.


use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use ragloom::llm::query_call;
use ragloom::tools::TOOL_WIKIPEDIA;
use ragloom::{
    build_tools_with, Chunk, CorpusTool, LlmResponse, MockLlm, RagGraph, RespondStrategy,
    Retriever, StaticRetriever, Tool, ToolCallContent, ToolRegistry, ToolSourceError, ToolSpec,
    FALLBACK_ANSWER, NO_DOCUMENTS_FOUND,
};

/// Knowledge tool stand-in that counts calls.
struct CountingKnowledge {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingKnowledge {
    fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

#[async_trait]
impl Tool for CountingKnowledge {
    fn name(&self) -> &str {
        TOOL_WIKIPEDIA
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_WIKIPEDIA.to_string(),
            description: Some("Search Wikipedia for general knowledge.".to_string()),
            input_schema: json!({"type": "object"}),
        }
    }

    async fn call(&self, _args: Value) -> Result<ToolCallContent, ToolSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ToolSourceError::Transport("connection reset by peer".into()));
        }
        Ok(ToolCallContent {
            text: "Page: Paris\nSummary: Paris is the capital of France.".to_string(),
        })
    }
}

fn agentic_graph(
    retriever: Arc<dyn Retriever>,
    knowledge: Arc<CountingKnowledge>,
    llm: Arc<MockLlm>,
    max_rounds: u32,
) -> RagGraph {
    let tools = build_tools_with(retriever.clone(), knowledge).unwrap();
    RagGraph::builder(retriever, llm)
        .strategy(RespondStrategy::Agentic)
        .max_rounds(max_rounds)
        .tools(Arc::new(tools))
        .build()
        .unwrap()
}

/// **Scenario**: Empty retrieval makes the corpus tool return exactly "No documents found.".
#[tokio::test]
async fn corpus_tool_reports_no_documents() {
    let tool = CorpusTool::new(Arc::new(StaticRetriever::empty()));
    let out = tool.call(json!({"query": "anything"})).await.unwrap();
    assert_eq!(out.text, "No documents found.");
    assert_eq!(out.text, NO_DOCUMENTS_FOUND);
}

/// **Scenario**: "No documents found." is observed as a result; the answer has no error text.
#[tokio::test]
async fn no_documents_is_an_observation_not_an_error() {
    let knowledge = Arc::new(CountingKnowledge::new(false));
    let llm = Arc::new(MockLlm::scripted(vec![
        LlmResponse {
            content: String::new(),
            tool_calls: vec![query_call("retriever", "quarterly revenue", "c1")],
            usage: None,
        },
        LlmResponse::text("The indexed documents do not mention quarterly revenue."),
    ]));
    let graph = agentic_graph(
        Arc::new(StaticRetriever::empty()),
        knowledge.clone(),
        llm.clone(),
        6,
    );

    let state = graph.run("What was the quarterly revenue?").await.unwrap();
    let answer = state.answer().to_lowercase();
    assert!(!answer.contains("error"), "{}", answer);
    assert!(!answer.contains("failed"), "{}", answer);
    assert_eq!(knowledge.calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        llm.recorded_prompts()[1],
        "Tool retriever returned: No documents found."
    );
}

/// **Scenario**: Every round requests a tool; with budget 3 the answer is the fallback.
#[tokio::test]
async fn round_budget_exhaustion_yields_fallback() {
    let llm = Arc::new(MockLlm::always_tool_call(query_call("retriever", "loop", "c")));
    let retriever = Arc::new(StaticRetriever::new(vec![Chunk::new("irrelevant")]));
    let graph = agentic_graph(
        retriever,
        Arc::new(CountingKnowledge::new(false)),
        llm.clone(),
        3,
    );
    let state = graph.run("never ends").await.unwrap();
    assert_eq!(state.answer(), FALLBACK_ANSWER);
    assert_eq!(llm.call_count(), 3);
}

/// **Scenario**: A failing tool becomes an observation and the agent still answers.
#[tokio::test]
async fn tool_failure_is_absorbed() {
    let knowledge = Arc::new(CountingKnowledge::new(true));
    let llm = Arc::new(MockLlm::first_tools_then_end(
        query_call(TOOL_WIKIPEDIA, "Paris", "w1"),
        "Paris is the capital of France.",
    ));
    let graph = agentic_graph(
        Arc::new(StaticRetriever::empty()),
        knowledge.clone(),
        llm.clone(),
        6,
    );
    let state = graph.run("Capital of France?").await.unwrap();
    assert_eq!(state.answer(), "Paris is the capital of France.");
    assert_eq!(knowledge.calls.load(Ordering::SeqCst), 1);
    assert!(llm.recorded_prompts()[1].contains("connection reset by peer"));
}

/// **Scenario**: Generation failure inside the agent ends with the fallback, not an error.
#[tokio::test]
async fn generation_failure_yields_fallback() {
    let graph = agentic_graph(
        Arc::new(StaticRetriever::empty()),
        Arc::new(CountingKnowledge::new(false)),
        Arc::new(MockLlm::failing("503 Service Unavailable")),
        6,
    );
    let state = graph.run("q").await.unwrap();
    assert_eq!(state.answer(), FALLBACK_ANSWER);
}

/// **Scenario**: The first-pass chunks stay in the state even though the agent retrieves on its own.
#[tokio::test]
async fn first_pass_chunks_are_kept() {
    let retriever = Arc::new(StaticRetriever::new(vec![
        Chunk::new("Agents plan.").with_metadata("title", "LLM Powered Agents"),
    ]));
    let llm = Arc::new(MockLlm::first_tools_then_end(
        query_call("retriever", "agent planning", "c1"),
        "Agents plan with task decomposition.",
    ));
    let graph = agentic_graph(
        retriever.clone(),
        Arc::new(CountingKnowledge::new(false)),
        llm.clone(),
        6,
    );
    let state = graph.run("How do agents plan?").await.unwrap();
    assert_eq!(state.retrieved_chunks().len(), 1);
    assert_eq!(state.answer(), "Agents plan with task decomposition.");
    assert_eq!(
        llm.recorded_prompts()[1],
        "Tool retriever returned: [1] LLM Powered Agents\nAgents plan."
    );
    // Retrieve stage (k = 4), then the corpus tool (default k).
    let queries = retriever.queries();
    assert_eq!(queries[0], ("How do agents plan?".to_string(), 4));
    assert_eq!(queries[1].0, "agent planning");
}

/// **Scenario**: Registering two tools under one name is rejected at construction.
#[test]
fn duplicate_tool_names_rejected() {
    let retriever: Arc<dyn Retriever> = Arc::new(StaticRetriever::empty());
    let err = ToolRegistry::from_tools([
        Arc::new(CorpusTool::new(retriever.clone())) as Arc<dyn Tool>,
        Arc::new(CorpusTool::new(retriever)) as Arc<dyn Tool>,
    ])
    .unwrap_err();
    assert!(matches!(err, ToolSourceError::DuplicateName(ref n) if n == "retriever"));
}
