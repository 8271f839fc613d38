//! Compiled state graph: immutable, supports invoke only.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
};
use super::node_middleware::{NodeFuture, NodeMiddleware};
use super::state_graph::END;
use super::{Next, NextEntry, Node};

/// Node executions allowed per invoke unless the builder overrides it.
pub const DEFAULT_RECURSION_LIMIT: usize = 64;

/// Executable graph produced by `StateGraph::compile`.
///
/// Cheap to share behind an `Arc`; `invoke` takes `&self` and owns its state,
/// so concurrent invocations never see each other's values.
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    /// Chain order for linear graphs; only the entry node when routing is conditional.
    pub(super) node_order: Vec<String>,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    pub(super) recursion_limit: usize,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node ids in execution order for a linear graph.
    pub fn node_order(&self) -> &[String] {
        &self.node_order
    }

    async fn run_node(&self, node: Arc<dyn Node<S>>, state: S) -> Result<(S, Next), AgentError> {
        match &self.middleware {
            Some(middleware) => {
                let node_id = node.id().to_string();
                middleware
                    .around_run(
                        &node_id,
                        state,
                        Box::new(move |s: S| -> NodeFuture<S> {
                            Box::pin(async move { node.run(s).await })
                        }),
                    )
                    .await
            }
            None => node.run(state).await,
        }
    }

    fn resolve_next(&self, current_id: &str, state: &S, next: Next) -> Option<String> {
        match self.next_map.get(current_id) {
            Some(NextEntry::Conditional(router)) => {
                let target = router.resolve_next(state);
                tracing::debug!(from = %current_id, to = %target, "conditional routing");
                Some(target)
            }
            Some(NextEntry::Unconditional(to)) => match next {
                Next::End => None,
                Next::Node(id) => Some(id),
                Next::Continue => Some(to.clone()),
            },
            None => match next {
                Next::Node(id) => Some(id),
                Next::Continue | Next::End => None,
            },
        }
    }

    /// Runs the graph from its entry node until a node ends the run or routing reaches END.
    ///
    /// Each node's output state replaces the current one. The first node error
    /// is logged and returned as-is; no partial state escapes.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        let mut current_id = self.first_node_id.clone();
        let mut state = state;
        let mut steps = 0usize;
        log_graph_start(&current_id);

        loop {
            if steps >= self.recursion_limit {
                let err = AgentError::ExecutionFailed(format!(
                    "recursion limit of {} steps reached at node {}",
                    self.recursion_limit, current_id
                ));
                log_graph_error(&current_id, &err);
                return Err(err);
            }
            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("routed to unknown node: {}", current_id))
            })?;

            log_node_start(&current_id, &state);
            let (new_state, next) = match self.run_node(node, state).await {
                Ok(output) => output,
                Err(e) => {
                    log_graph_error(&current_id, &e);
                    return Err(e);
                }
            };
            log_node_complete(&current_id, &next);
            state = new_state;
            steps += 1;

            match self.resolve_next(&current_id, &state, next) {
                Some(id) if id != END => current_id = id,
                _ => {
                    log_graph_complete(steps);
                    return Ok(state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::graph::{LoggingNodeMiddleware, StateGraph, START};

    #[derive(Clone, Debug, Default)]
    struct Trace(Vec<String>);

    struct Push(&'static str);

    #[async_trait]
    impl Node<Trace> for Push {
        fn id(&self) -> &str {
            self.0
        }
        async fn run(&self, state: Trace) -> Result<(Trace, Next), AgentError> {
            let mut v = state.0;
            v.push(self.0.to_string());
            Ok((Trace(v), Next::Continue))
        }
    }

    struct Fail;

    #[async_trait]
    impl Node<Trace> for Fail {
        fn id(&self) -> &str {
            "fail"
        }
        async fn run(&self, _state: Trace) -> Result<(Trace, Next), AgentError> {
            Err(AgentError::Generation("provider down".into()))
        }
    }

    /// Jumps back to itself until it has run `limit` times.
    struct Looper {
        runs: AtomicUsize,
        limit: usize,
    }

    #[async_trait]
    impl Node<Trace> for Looper {
        fn id(&self) -> &str {
            "loop"
        }
        async fn run(&self, state: Trace) -> Result<(Trace, Next), AgentError> {
            let n = self.runs.fetch_add(1, Ordering::SeqCst) + 1;
            let next = if n >= self.limit {
                Next::End
            } else {
                Next::Node("loop".into())
            };
            Ok((state, next))
        }
    }

    /// **Scenario**: Linear graph runs nodes in edge order and threads state through.
    #[tokio::test]
    async fn invoke_runs_linear_chain_in_order() {
        let mut graph = StateGraph::<Trace>::new();
        graph
            .add_node("a", Arc::new(Push("a")))
            .add_node("b", Arc::new(Push("b")))
            .add_edge(START, "a")
            .add_edge("a", "b")
            .add_edge("b", END);
        let compiled = graph
            .with_middleware(Arc::new(LoggingNodeMiddleware::<Trace>::default()))
            .compile()
            .unwrap();
        let out = compiled.invoke(Trace::default()).await.unwrap();
        assert_eq!(out.0, vec!["a", "b"]);
    }

    /// **Scenario**: A failing node surfaces its error unchanged.
    #[tokio::test]
    async fn invoke_propagates_node_error() {
        let mut graph = StateGraph::<Trace>::new();
        graph
            .add_node("a", Arc::new(Push("a")))
            .add_node("fail", Arc::new(Fail))
            .add_edge(START, "a")
            .add_edge("a", "fail")
            .add_edge("fail", END);
        let compiled = graph.compile().unwrap();
        let err = compiled.invoke(Trace::default()).await.unwrap_err();
        assert!(matches!(err, AgentError::Generation(m) if m == "provider down"));
    }

    /// **Scenario**: A node that keeps jumping to itself is stopped by the recursion limit.
    #[tokio::test]
    async fn invoke_stops_at_recursion_limit() {
        let mut graph = StateGraph::<Trace>::new();
        graph
            .add_node(
                "loop",
                Arc::new(Looper {
                    runs: AtomicUsize::new(0),
                    limit: 100,
                }),
            )
            .add_edge(START, "loop")
            .add_edge("loop", END);
        let compiled = graph.with_recursion_limit(5).compile().unwrap();
        let err = compiled.invoke(Trace::default()).await.unwrap_err();
        assert!(err.to_string().contains("recursion limit"), "{}", err);
    }

    /// **Scenario**: Next::End from a node with an outgoing edge stops the run early.
    #[tokio::test]
    async fn next_end_stops_before_edge_target() {
        let mut graph = StateGraph::<Trace>::new();
        graph
            .add_node(
                "loop",
                Arc::new(Looper {
                    runs: AtomicUsize::new(0),
                    limit: 3,
                }),
            )
            .add_node("after", Arc::new(Push("after")))
            .add_edge(START, "loop")
            .add_edge("loop", "after")
            .add_edge("after", END);
        let compiled = graph.compile().unwrap();
        let out = compiled.invoke(Trace::default()).await.unwrap();
        assert!(out.0.is_empty(), "after must not run: {:?}", out.0);
    }
}
