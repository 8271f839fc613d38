//! Mock LLM for tests and offline runs.
//!
//! Replies come from a script (the last entry repeats once the script runs
//! out), from an echo of the latest user message, or from a fixed failure.
//! Every message list the mock receives is recorded so tests can assert on
//! the exact prompts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::ToolCall;

enum Behavior {
    Scripted(Vec<LlmResponse>),
    Echo,
    Fail(String),
}

/// Scripted LLM implementing [`LlmClient`].
pub struct MockLlm {
    behavior: Behavior,
    calls: AtomicUsize,
    recorded: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Replies in order; the last reply repeats when the script is exhausted.
    pub fn scripted(replies: Vec<LlmResponse>) -> Self {
        Self::with_behavior(Behavior::Scripted(replies))
    }

    /// Same content and tool calls on every turn.
    pub fn new(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::scripted(vec![LlmResponse {
            content: content.into(),
            tool_calls,
            usage: None,
        }])
    }

    /// Plain answer, never a tool call.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::new(content, vec![])
    }

    /// Requests `call` on every turn; never reaches a final answer.
    pub fn always_tool_call(call: ToolCall) -> Self {
        Self::new("", vec![call])
    }

    /// First turn requests `call`, every later turn answers with `answer`.
    pub fn first_tools_then_end(call: ToolCall, answer: impl Into<String>) -> Self {
        Self::scripted(vec![
            LlmResponse {
                content: String::new(),
                tool_calls: vec![call],
                usage: None,
            },
            LlmResponse::text(answer),
        ])
    }

    /// Answers with the content of the most recent user message.
    pub fn echo() -> Self {
        Self::with_behavior(Behavior::Echo)
    }

    /// Every call fails with [`AgentError::Generation`].
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(message.into()))
    }

    /// Number of invoke calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every message list received, in call order.
    pub fn recorded_messages(&self) -> Vec<Vec<Message>> {
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Content of the last user message of every call, in call order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.recorded_messages()
            .iter()
            .filter_map(|msgs| last_user_text(msgs).map(str::to_string))
            .collect()
    }
}

fn last_user_text(messages: &[Message]) -> Option<&str> {
    messages.iter().rev().find_map(|m| match m {
        Message::User(s) => Some(s.as_str()),
        _ => None,
    })
}

/// Tool call with a JSON `query` argument, for scripting agent tests.
pub fn query_call(tool: &str, query: &str, id: &str) -> ToolCall {
    ToolCall {
        name: tool.to_string(),
        arguments: serde_json::json!({ "query": query }).to_string(),
        id: Some(id.to_string()),
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(messages.to_vec());
        match &self.behavior {
            Behavior::Scripted(replies) => replies
                .get(n)
                .or_else(|| replies.last())
                .cloned()
                .ok_or_else(|| AgentError::Generation("mock script is empty".to_string())),
            Behavior::Echo => Ok(LlmResponse::text(
                last_user_text(messages).unwrap_or_default(),
            )),
            Behavior::Fail(msg) => Err(AgentError::Generation(msg.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Scripted replies come in order and the last one repeats.
    #[tokio::test]
    async fn scripted_replies_in_order_then_repeat_last() {
        let llm = MockLlm::first_tools_then_end(query_call("retriever", "q", "c1"), "done");
        let first = llm.invoke(&[Message::user("q")]).await.unwrap();
        assert_eq!(first.tool_calls.len(), 1);
        let second = llm.invoke(&[Message::user("q")]).await.unwrap();
        assert_eq!(second.content, "done");
        let third = llm.invoke(&[Message::user("q")]).await.unwrap();
        assert_eq!(third.content, "done");
        assert_eq!(llm.call_count(), 3);
    }

    /// **Scenario**: Echo answers with the latest user message and records the prompt.
    #[tokio::test]
    async fn echo_returns_last_user_message() {
        let llm = MockLlm::echo();
        let out = llm.complete("what is rust?").await.unwrap();
        assert_eq!(out, "what is rust?");
        assert_eq!(llm.recorded_prompts(), vec!["what is rust?".to_string()]);
    }

    /// **Scenario**: Failing mock returns a Generation error.
    #[tokio::test]
    async fn failing_mock_returns_generation_error() {
        let llm = MockLlm::failing("rate limited");
        let err = llm.complete("q").await.unwrap_err();
        assert!(matches!(err, AgentError::Generation(m) if m == "rate limited"));
    }

    /// **Scenario**: query_call encodes the query as JSON arguments.
    #[test]
    fn query_call_builds_json_arguments() {
        let call = query_call("wikipedia", "Rust language", "c9");
        let v: serde_json::Value = serde_json::from_str(&call.arguments).unwrap();
        assert_eq!(v["query"], "Rust language");
        assert_eq!(call.id.as_deref(), Some("c9"));
    }
}
