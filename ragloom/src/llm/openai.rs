//! OpenAI Chat Completions client implementing [`LlmClient`].
//!
//! Requires `OPENAI_API_KEY` (or an explicit [`OpenAIConfig`]). Tools can be
//! fixed on the client with [`ChatOpenAI::with_tools`] or passed per call via
//! [`LlmClient::invoke_with_tools`]; either way the response may carry
//! `tool_calls`. Every API failure maps to [`AgentError::Generation`].

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionTools, CreateChatCompletionRequestArgs,
        FunctionObject, ToolChoiceOptions,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage, ToolChoiceMode};
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

/// OpenAI chat client.
///
/// Uses `OPENAI_API_KEY` from the environment by default, or the config given
/// to [`ChatOpenAI::with_config`].
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
    tool_choice: Option<ToolChoiceMode>,
}

impl ChatOpenAI {
    /// Client with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Client with a custom config, e.g. a different API key or base URL.
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: None,
        }
    }

    /// Tools offered on every call that does not pass its own.
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Temperature (0–2). Lower is more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Overrides the API default tool choice when tools are present.
    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = Some(mode);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant(s) => ChatCompletionRequestMessage::Assistant(s.as_str().into()),
            })
            .collect()
    }

    fn tools_to_request(tools: &[ToolSpec]) -> Vec<ChatCompletionTools> {
        tools
            .iter()
            .map(|t| {
                ChatCompletionTools::Function(ChatCompletionTool {
                    function: FunctionObject {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: Some(t.input_schema.clone()),
                        ..Default::default()
                    },
                })
            })
            .collect()
    }

    async fn create(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSpec]>,
    ) -> Result<LlmResponse, AgentError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages));

        let tools = tools.filter(|t| !t.is_empty());
        if let Some(tools) = tools {
            args.tools(Self::tools_to_request(tools));
            if let Some(mode) = self.tool_choice {
                let opt = match mode {
                    ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
                    ToolChoiceMode::None => ToolChoiceOptions::None,
                    ToolChoiceMode::Required => ToolChoiceOptions::Required,
                };
                args.tool_choice(ChatCompletionToolChoiceOption::Mode(opt));
            }
        }
        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args
            .build()
            .map_err(|e| AgentError::Generation(format!("OpenAI request build failed: {}", e)))?;

        debug!(
            trace_id = %trace_id,
            model = %self.model,
            message_count = messages.len(),
            tools_count = tools.map(|t| t.len()).unwrap_or(0),
            temperature = ?self.temperature,
            tool_choice = ?self.tool_choice,
            "OpenAI chat create"
        );
        if let Ok(js) = serde_json::to_string(&request) {
            trace!(trace_id = %trace_id, request = %js, "OpenAI request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::Generation(format!("OpenAI API error: {}", e)))?;

        if let Ok(js) = serde_json::to_string(&response) {
            trace!(trace_id = %trace_id, response = %js, "OpenAI response body");
        }

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Generation("OpenAI returned no choices".to_string()))?;
        let msg = choice.message;
        let tool_calls = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall {
                    name: f.function.name,
                    arguments: f.function.arguments,
                    id: Some(f.id),
                }),
                _ => None,
            })
            .collect();

        Ok(LlmResponse {
            content: msg.content.unwrap_or_default(),
            tool_calls,
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        self.create(messages, self.tools.as_deref()).await
    }

    async fn invoke_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        self.create(messages, Some(tools)).await
    }
}
