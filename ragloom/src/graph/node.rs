//! Graph node trait: one step in a StateGraph.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AgentError;

use super::Next;

/// One step in a graph: state in, (state out, next step).
///
/// A node owns the state value it receives and returns a new one; the runner
/// replaces its current state with the returned value.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"retrieve"`, `"think"`). Must be unique within a graph.
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;
}
