//! Act node: execute each requested tool call and collect the results.
//!
//! By default a failing tool becomes an error observation
//! ([`HandleToolErrors::Always`]) so the model can react to it on the next
//! turn. [`HandleToolErrors::Never`] propagates the failure as
//! [`AgentError::ToolInvocation`] instead.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::state::{ReActState, ToolResult};
use crate::tool_source::{ToolSource, ToolSourceError};

/// Error observation template; `{tool_name}`, `{tool_kwargs}` and `{error}` are substituted.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

/// Custom error formatter: (error, tool name, parsed arguments) → observation text.
pub type ErrorHandlerFn =
    Arc<dyn Fn(&ToolSourceError, &str, &Value) -> String + Send + Sync + 'static>;

/// How [`ActNode`] treats a failing tool call.
#[derive(Clone)]
pub enum HandleToolErrors {
    /// Fail the run with [`AgentError::ToolInvocation`].
    Never,
    /// Record an error observation: the given text, or [`DEFAULT_EXECUTION_ERROR_TEMPLATE`].
    Always(Option<String>),
    Custom(ErrorHandlerFn),
}

impl Default for HandleToolErrors {
    fn default() -> Self {
        Self::Always(None)
    }
}

impl std::fmt::Debug for HandleToolErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "HandleToolErrors::Never"),
            Self::Always(msg) => write!(f, "HandleToolErrors::Always({:?})", msg),
            Self::Custom(_) => write!(f, "HandleToolErrors::Custom(<fn>)"),
        }
    }
}

fn truncate_for_log(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}

/// Parses a tool call's argument string. Empty or malformed input becomes `{}`;
/// a JSON string holding JSON (double-encoded) is decoded once more.
pub(crate) fn parse_tool_arguments(arguments: &str) -> Value {
    if arguments.trim().is_empty() {
        return serde_json::json!({});
    }
    let raw: Value = match serde_json::from_str(arguments) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, arguments = %arguments, "tool arguments JSON parse failed, using empty object");
            return serde_json::json!({});
        }
    };
    match raw.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(raw),
        None => raw,
    }
}

/// Runs `state.tool_calls` in order against a [`ToolSource`].
pub struct ActNode {
    tools: Arc<dyn ToolSource>,
    handle_tool_errors: HandleToolErrors,
}

impl ActNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self {
            tools,
            handle_tool_errors: HandleToolErrors::default(),
        }
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    fn handle_error(&self, error: &ToolSourceError, tool_name: &str, args: &Value) -> Option<String> {
        match &self.handle_tool_errors {
            HandleToolErrors::Never => None,
            HandleToolErrors::Always(custom) => Some(custom.clone().unwrap_or_else(|| {
                DEFAULT_EXECUTION_ERROR_TEMPLATE
                    .replace("{tool_name}", tool_name)
                    .replace("{tool_kwargs}", &args.to_string())
                    .replace("{error}", &error.to_string())
            })),
            HandleToolErrors::Custom(handler) => Some(handler(error, tool_name, args)),
        }
    }
}

#[async_trait]
impl Node<ReActState> for ActNode {
    fn id(&self) -> &str {
        "act"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let mut tool_results = Vec::with_capacity(state.tool_calls.len());

        for tc in &state.tool_calls {
            let args = parse_tool_arguments(&tc.arguments);
            debug!(tool = %tc.name, args = %args, "calling tool");

            match self.tools.call_tool(&tc.name, args.clone()).await {
                Ok(content) => {
                    trace!(
                        tool = %tc.name,
                        result_len = content.text.len(),
                        result_preview = %truncate_for_log(&content.text, 200),
                        "tool returned"
                    );
                    tool_results.push(ToolResult {
                        call_id: tc.id.clone(),
                        name: Some(tc.name.clone()),
                        content: content.text,
                        is_error: false,
                    });
                }
                Err(e) => {
                    warn!(tool = %tc.name, error = %e, "tool call failed");
                    let Some(observation) = self.handle_error(&e, &tc.name, &args) else {
                        return Err(AgentError::ToolInvocation(format!("{}: {}", tc.name, e)));
                    };
                    tool_results.push(ToolResult {
                        call_id: tc.id.clone(),
                        name: Some(tc.name.clone()),
                        content: observation,
                        is_error: true,
                    });
                }
            }
        }

        Ok((
            ReActState {
                tool_results,
                ..state
            },
            Next::Continue,
        ))
    }
}
