//! Routing result returned by a node.

/// Next step after running a node.
///
/// - **Continue**: follow the node's outgoing edge (END when there is none).
/// - **Node(id)**: jump to the given node (observe → think in the agent loop).
/// - **End**: stop and return the current state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Next {
    Continue,
    Node(String),
    End,
}
