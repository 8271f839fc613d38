//! Node middleware: wrap each node.run with async logic (around pattern).

use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use crate::error::AgentError;

use super::Next;

/// Boxed future returned by a node run.
pub type NodeFuture<S> = Pin<Box<dyn Future<Output = Result<(S, Next), AgentError>> + Send>>;

/// The wrapped node call handed to middleware.
pub type NodeRunFn<S> = Box<dyn FnOnce(S) -> NodeFuture<S> + Send>;

/// Async middleware around node execution. Set via `StateGraph::with_middleware`.
#[async_trait]
pub trait NodeMiddleware<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Must call `inner` to execute the node; may inspect or replace its result.
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError>;
}
