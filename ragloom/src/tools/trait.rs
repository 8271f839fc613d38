use async_trait::async_trait;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};

/// A single named tool the reasoning agent can call.
///
/// The name must be unique within a [`ToolRegistry`](super::ToolRegistry); the
/// description in [`Tool::spec`] is what the model reads when choosing a tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Name, description and JSON schema of the arguments.
    fn spec(&self) -> ToolSpec;

    /// Runs the tool. Failures are returned, never panicked; the act node
    /// turns them into observations.
    async fn call(&self, args: serde_json::Value) -> Result<ToolCallContent, ToolSourceError>;
}
