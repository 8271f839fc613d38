//! Generation port: the LLM client abstraction used by the respond stage and
//! the reasoning agent's think node.
//!
//! [`LlmClient::invoke`] takes a message history and returns assistant text plus
//! optional tool calls; [`LlmClient::complete`] is the single-prompt form used
//! by the direct strategy. Implementations: [`MockLlm`] (scripted, records
//! prompts) and [`ChatOpenAI`] (OpenAI Chat Completions).

mod mock;
mod openai;

pub use mock::{query_call, MockLlm};
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

/// Tool choice mode for chat completions when tools are present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model picks between a message and tool calls.
    #[default]
    Auto,
    /// Model will not call any tool.
    None,
    /// Model must call one or more tools.
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!(
                "unknown tool_choice: {} (use auto, none, or required)",
                s
            )),
        }
    }
}

/// Token usage for one LLM call.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Assistant text and tool calls from one completion.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    pub content: String,
    /// Empty means the model answered without requesting a tool.
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

/// LLM client: given messages, returns assistant text and optional tool calls.
///
/// Provider failures must come back as [`AgentError::Generation`] so callers can
/// tell them apart from wiring errors.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One turn over the full message history.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;

    /// One turn with `tools` offered to the model.
    ///
    /// Default ignores `tools`; clients that support tool calling override it.
    async fn invoke_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let _ = tools;
        self.invoke(messages).await
    }

    /// Single prompt in, text out. Sends the prompt as one user message.
    async fn complete(&self, prompt: &str) -> Result<String, AgentError> {
        let response = self.invoke(&[Message::user(prompt)]).await?;
        Ok(response.content)
    }
}
