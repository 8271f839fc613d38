//! Think node: call the LLM over the message history with the tool specs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::ReActState;
use crate::tool_source::ToolSpec;

/// Appends one assistant message and replaces `tool_calls` with the model's requests.
///
/// Tool specs are listed once when the agent is built and offered on every turn.
/// Provider failures propagate as [`AgentError::Generation`].
pub struct ThinkNode {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
}

impl ThinkNode {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Vec<ToolSpec>) -> Self {
        Self { llm, tools }
    }
}

#[async_trait]
impl Node<ReActState> for ThinkNode {
    fn id(&self) -> &str {
        "think"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let response = self
            .llm
            .invoke_with_tools(&state.messages, &self.tools)
            .await?;
        tracing::debug!(
            turn = state.turn_count,
            tool_calls = response.tool_calls.len(),
            content_len = response.content.len(),
            "think"
        );
        let mut messages = state.messages;
        messages.push(Message::Assistant(response.content));
        Ok((
            ReActState {
                messages,
                tool_calls: response.tool_calls,
                tool_results: Vec::new(),
                turn_count: state.turn_count,
            },
            Next::Continue,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::state::ToolCall;

    /// **Scenario**: Think appends the reply and records requested tool calls.
    #[tokio::test]
    async fn think_appends_reply_and_tool_calls() {
        let call = ToolCall {
            name: "retriever".into(),
            arguments: r#"{"query":"q"}"#.into(),
            id: Some("c1".into()),
        };
        let node = ThinkNode::new(Arc::new(MockLlm::new("looking", vec![call.clone()])), vec![]);
        let (out, next) = node.run(ReActState::seeded(None, "q")).await.unwrap();
        assert_eq!(out.messages.last(), Some(&Message::assistant("looking")));
        assert_eq!(out.tool_calls, vec![call]);
        assert_eq!(next, Next::Continue);
    }

    /// **Scenario**: A provider failure propagates as a Generation error.
    #[tokio::test]
    async fn think_propagates_generation_failure() {
        let node = ThinkNode::new(Arc::new(MockLlm::failing("timeout")), vec![]);
        let err = node.run(ReActState::seeded(None, "q")).await.unwrap_err();
        assert!(err.is_generation());
    }
}
