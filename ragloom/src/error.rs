//! Agent execution error types.
//!
//! Returned by graph nodes, the retrieval and generation ports, and the
//! reasoning agent. Ingestion and index construction have their own error
//! types ([`IngestError`](crate::ingest::IngestError),
//! [`IndexError`](crate::index::IndexError)) because they fail before any
//! graph runs.

use thiserror::Error;

/// Error raised while running a node or calling a port.
///
/// The workflow graph surfaces these unchanged to the caller of
/// [`RagGraph::run`](crate::workflow::RagGraph::run).
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. graph wiring, retrieval backend error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A port was used before its backing resource was set up.
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// The model provider failed (transport, rate limit, malformed response).
    #[error("generation failed: {0}")]
    Generation(String),

    /// A tool call failed and the act node was configured to propagate it.
    #[error("tool invocation failed: {0}")]
    ToolInvocation(String),
}

impl AgentError {
    /// True when the failure came from the model provider.
    pub fn is_generation(&self) -> bool {
        matches!(self, AgentError::Generation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display format of ExecutionFailed contains "execution failed" and the message.
    #[test]
    fn agent_error_display_execution_failed() {
        let err = AgentError::ExecutionFailed("msg".to_string());
        let s = err.to_string();
        assert!(s.contains("execution failed"), "{}", s);
        assert!(s.contains("msg"), "{}", s);
    }

    /// **Scenario**: NotInitialized names the resource that is missing.
    #[test]
    fn agent_error_display_not_initialized() {
        let err = AgentError::NotInitialized("vector store".to_string());
        assert_eq!(err.to_string(), "not initialized: vector store");
    }

    /// **Scenario**: Only Generation reports is_generation.
    #[test]
    fn is_generation_only_for_generation_variant() {
        assert!(AgentError::Generation("timeout".into()).is_generation());
        assert!(!AgentError::ToolInvocation("x".into()).is_generation());
        assert!(!AgentError::ExecutionFailed("x".into()).is_generation());
    }
}
