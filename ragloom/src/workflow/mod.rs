//! Workflow: `START → retrieve → respond → END` over [`WorkflowState`](crate::state::WorkflowState).
//!
//! [`RetrieveNode`] always runs first and fills the retrieved chunks. [`RespondNode`]
//! answers either directly from those chunks ([`RespondStrategy::Direct`]) or by
//! delegating to the reasoning agent ([`RespondStrategy::Agentic`]), which does its
//! own retrieval through tools. [`RagGraph`] is the compiled pipeline.

mod rag_graph;
mod respond_node;
mod retrieve_node;

pub use rag_graph::{RagGraph, RagGraphBuilder};
pub use respond_node::{build_direct_prompt, RespondNode, RespondStrategy};
pub use retrieve_node::RetrieveNode;
