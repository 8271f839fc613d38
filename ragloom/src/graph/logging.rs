//! Structured tracing events for graph execution.

use std::fmt::Debug;

use crate::error::AgentError;

use super::Next;

pub fn log_node_start<S: Debug>(node_id: &str, state: &S) {
    tracing::debug!(node_id = node_id, state = ?state, "Starting node execution");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id = node_id, ?next, "Node execution complete");
}

pub fn log_graph_start(first_node: &str) {
    tracing::debug!(first_node = first_node, "Starting graph execution");
}

pub fn log_graph_complete(steps: usize) {
    tracing::debug!(steps = steps, "Graph execution complete");
}

pub fn log_graph_error(node_id: &str, error: &AgentError) {
    tracing::error!(node_id = node_id, %error, "Graph execution error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_functions_do_not_panic() {
        log_node_start("retrieve", &"state");
        log_node_complete("retrieve", &Next::Continue);
        log_graph_start("retrieve");
        log_graph_complete(2);
        log_graph_error("respond", &AgentError::Generation("boom".into()));
    }
}
