use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};
use crate::tools::r#trait::Tool;

/// Ordered set of uniquely named tools.
///
/// Registration order is the order tools are offered to the model. A second
/// tool under an existing name is rejected with
/// [`ToolSourceError::DuplicateName`] instead of replacing the first.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `tools` in order; fails on the first duplicate name.
    pub fn from_tools(
        tools: impl IntoIterator<Item = Arc<dyn Tool>>,
    ) -> Result<Self, ToolSourceError> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolSourceError> {
        if self.get(tool.name()).is_some() {
            return Err(ToolSourceError::DuplicateName(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Specs of every tool, in registration order.
    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Calls the tool registered under `name`.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(args).await
    }
}

#[async_trait]
impl ToolSource for ToolRegistry {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.list())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call(name, arguments).await
    }
}
