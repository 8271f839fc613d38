//! Reasoning agent: a bounded think → act → observe loop on [`StateGraph`](crate::graph::StateGraph).
//!
//! - [`ThinkNode`] asks the model for either a final reply or tool calls.
//! - [`ActNode`] runs the calls against a [`ToolSource`](crate::tool_source::ToolSource);
//!   failures become observations per [`HandleToolErrors`].
//! - [`ObserveNode`] appends the results to the history and loops until the round budget is used.
//! - [`ReasoningAgent`] wires them and turns the final state into an answer, falling back to
//!   [`FALLBACK_ANSWER`].

mod act_node;
mod observe_node;
mod reasoning_agent;
mod think_node;

pub use act_node::{ActNode, ErrorHandlerFn, HandleToolErrors, DEFAULT_EXECUTION_ERROR_TEMPLATE};
pub use observe_node::ObserveNode;
pub use reasoning_agent::{
    ReasoningAgent, ReasoningAgentBuilder, AGENT_SYSTEM_PROMPT, DEFAULT_MAX_ROUNDS,
    FALLBACK_ANSWER,
};
pub use think_node::ThinkNode;

use crate::graph::END;
use crate::state::ReActState;

/// Routing key produced after the think node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolsConditionResult {
    /// The model requested tools: go to act.
    Tools,
    /// No tool calls: finish.
    End,
}

impl ToolsConditionResult {
    /// `"tools"` or [`END`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::End => END,
        }
    }
}

/// Routes to tools when the last think produced tool calls, else to END.
pub fn tools_condition(state: &ReActState) -> ToolsConditionResult {
    if state.tool_calls.is_empty() {
        ToolsConditionResult::End
    } else {
        ToolsConditionResult::Tools
    }
}
