//! Observe node: fold tool results into the history and decide whether to loop.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::Message;
use crate::state::ReActState;

/// Appends one `Tool <name> returned: <content>` user message per result,
/// clears `tool_calls`/`tool_results`, and counts the round.
///
/// Returns `Next::Node("think")` while rounds remain, `Next::End` once
/// `turn_count` reaches `max_rounds`.
pub struct ObserveNode {
    max_rounds: u32,
}

impl ObserveNode {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }
}

#[async_trait]
impl Node<ReActState> for ObserveNode {
    fn id(&self) -> &str {
        "observe"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let mut messages = state.messages;
        for tr in &state.tool_results {
            let name = tr
                .name
                .as_deref()
                .or(tr.call_id.as_deref())
                .unwrap_or("tool");
            messages.push(Message::User(format!("Tool {} returned: {}", name, tr.content)));
        }
        let turn_count = state.turn_count.saturating_add(1);
        let next = if turn_count >= self.max_rounds {
            tracing::warn!(rounds = turn_count, "agent round budget exhausted");
            Next::End
        } else {
            Next::Node("think".to_string())
        };
        Ok((
            ReActState {
                messages,
                tool_calls: Vec::new(),
                tool_results: Vec::new(),
                turn_count,
            },
            next,
        ))
    }
}
