//! State types threaded through the graphs.
//!
//! - [`WorkflowState`] and [`Chunk`]: the retrieve → respond pipeline.
//! - [`ReActState`], [`ToolCall`], [`ToolResult`]: the reasoning agent's think → act → observe loop.

mod react_state;
mod workflow_state;

pub use react_state::{ReActState, ToolCall, ToolResult};
pub use workflow_state::{Chunk, WorkflowState, METADATA_SOURCE, METADATA_TITLE};
