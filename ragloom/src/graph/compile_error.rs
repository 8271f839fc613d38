//! Graph compilation error.

use thiserror::Error;

/// Returned by `StateGraph::compile` when the wiring is invalid.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge leaves START.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// Nothing routes to END.
    #[error("graph must have at least one edge to END")]
    MissingEnd,

    /// Branch, cycle or duplicate edge in a graph without conditional routing.
    #[error("edges must form a single linear chain from START to END: {0}")]
    InvalidChain(String),

    #[error("node has both edge and conditional edges: {0}")]
    NodeHasBothEdgeAndConditional(String),

    /// A value in a conditional path_map is not a registered node or END.
    #[error("conditional path_map invalid target: {0}")]
    InvalidConditionalPathMap(String),
}
