//! Tool source abstraction: list tools and call a tool by name.
//!
//! The reasoning agent's act node depends on [`ToolSource`] rather than on a
//! concrete registry; [`ToolRegistry`](crate::tools::ToolRegistry) is the
//! implementation used in the pipeline.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification sent to the model: name, description, JSON schema of arguments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    /// Read by the model when choosing among tools.
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Text result of a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallContent {
    pub text: String,
}

/// Errors from registering, listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    /// Network or backend failure inside a tool.
    #[error("transport error: {0}")]
    Transport(String),
    /// Two tools registered under one name.
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),
}

/// List available tools and call one by name with JSON arguments.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;
}
