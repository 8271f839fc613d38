//! State graph: nodes, edges, conditional routing, compile and invoke.
//!
//! Both the retrieve → respond workflow and the reasoning agent's
//! think → act → observe loop are built on [`StateGraph`].

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod logging_middleware;
mod next;
mod node;
mod node_middleware;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
};
pub use logging_middleware::LoggingNodeMiddleware;
pub use next::Next;
pub use node::Node;
pub use node_middleware::{NodeFuture, NodeMiddleware, NodeRunFn};
pub use state_graph::{StateGraph, END, START};
