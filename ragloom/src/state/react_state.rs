//! ReAct state and tool types for the reasoning agent.
//!
//! ReActState holds messages plus per-round tool_calls and tool_results; Think/Act/Observe
//! nodes read and write these fields.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A single tool invocation requested by the model (Think writes, Act reads).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name as registered in the tool registry.
    pub name: String,
    /// Arguments as a JSON string; parsed in Act.
    pub arguments: String,
    /// Provider call id, when the model returns one.
    pub id: Option<String>,
}

/// Result of executing one tool call (Act writes, Observe reads).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: Option<String>,
    pub name: Option<String>,
    pub content: String,
    /// True when `content` is an error observation rather than tool output.
    #[serde(default)]
    pub is_error: bool,
}

/// State for the think → act → observe loop.
///
/// A fresh value is built per agent run; nothing in it is shared between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReActState {
    /// Conversation history. Think appends Assistant messages, Observe appends observations.
    pub messages: Vec<Message>,
    /// Current round tool calls from the model.
    pub tool_calls: Vec<ToolCall>,
    /// Current round tool results.
    pub tool_results: Vec<ToolResult>,
    /// Number of completed observe rounds.
    #[serde(default)]
    pub turn_count: u32,
}

impl ReActState {
    /// Initial state: system prompt (when given) followed by the user's question.
    pub fn seeded(system_prompt: Option<&str>, question: &str) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(p) = system_prompt {
            messages.push(Message::system(p));
        }
        messages.push(Message::user(question));
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Content of the chronologically last Assistant message, if any.
    pub fn last_assistant_reply(&self) -> Option<String> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(s) => Some(s.clone()),
            _ => None,
        })
    }

    /// The final answer: the last message in the session when it is a non-empty
    /// Assistant reply.
    ///
    /// Returns `None` when the loop stopped on an observation (round budget
    /// exhausted) or the model produced no text.
    pub fn final_answer(&self) -> Option<&str> {
        match self.messages.last() {
            Some(Message::Assistant(s)) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: seeded state holds system prompt then question, nothing else.
    #[test]
    fn seeded_state_has_system_and_question() {
        let s = ReActState::seeded(Some("sys"), "q");
        assert_eq!(s.messages, vec![Message::system("sys"), Message::user("q")]);
        assert!(s.tool_calls.is_empty());
        assert_eq!(s.turn_count, 0);
    }

    /// **Scenario**: final_answer is None when the last message is an observation.
    #[test]
    fn final_answer_none_after_observation() {
        let mut s = ReActState::seeded(None, "q");
        s.messages.push(Message::assistant("calling tool"));
        s.messages.push(Message::user("Tool retriever returned: x"));
        assert_eq!(s.final_answer(), None);
        assert_eq!(s.last_assistant_reply().as_deref(), Some("calling tool"));
    }

    /// **Scenario**: final_answer ignores a blank assistant reply.
    #[test]
    fn final_answer_ignores_blank_reply() {
        let mut s = ReActState::seeded(None, "q");
        s.messages.push(Message::assistant("  "));
        assert_eq!(s.final_answer(), None);
        s.messages.push(Message::assistant("Paris."));
        assert_eq!(s.final_answer(), Some("Paris."));
    }
}
