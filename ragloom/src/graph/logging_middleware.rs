//! Middleware that logs node enter/exit and elapsed time through `tracing`.

use async_trait::async_trait;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Instant;

use crate::error::AgentError;

use super::{Next, NodeMiddleware, NodeRunFn};

/// Logs `enter` before and `exit` (with next step or error) after each node.
pub struct LoggingNodeMiddleware<S> {
    _phantom: PhantomData<fn(S)>,
}

impl<S> Default for LoggingNodeMiddleware<S> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<S> NodeMiddleware<S> for LoggingNodeMiddleware<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: NodeRunFn<S>,
    ) -> Result<(S, Next), AgentError> {
        tracing::info!(node = node_id, "enter");
        let started = Instant::now();
        let result = inner(state).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok((_, next)) => tracing::info!(node = node_id, ?next, elapsed_ms, "exit"),
            Err(e) => tracing::warn!(node = node_id, error = %e, elapsed_ms, "exit with error"),
        }
        result
    }
}
