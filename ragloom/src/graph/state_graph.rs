//! State graph builder: nodes, explicit edges (from → to) and conditional edges.
//!
//! Register nodes with `add_node`, wire them with `add_edge(from, to)` using
//! [`START`] and [`END`] for entry and exit, and route on state with
//! `add_conditional_edges`. `compile` validates the wiring and returns a
//! [`CompiledStateGraph`].
//!
//! A node has either one outgoing `add_edge` or `add_conditional_edges`, never
//! both. Graphs without conditional edges must form a single chain from START
//! to END.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use super::compile_error::CompilationError;
use super::compiled::{CompiledStateGraph, DEFAULT_RECURSION_LIMIT};
use super::conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
use super::node::Node;
use super::node_middleware::NodeMiddleware;

/// Sentinel for graph entry: `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// Mutable graph definition. Generic over the state type `S`.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
    conditional_edges: HashMap<String, ConditionalRouter<S>>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    recursion_limit: usize,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional_edges: HashMap::new(),
            middleware: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Wraps every node run with `middleware` in the compiled graph.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Maximum number of node executions per invoke before the run fails.
    pub fn with_recursion_limit(self, limit: usize) -> Self {
        Self {
            recursion_limit: limit.max(1),
            ..self
        }
    }

    /// Adds a node. A second node with the same id replaces the first.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an edge from `from_id` to `to_id` (START / END allowed).
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Routes out of `source` by calling `path(state)` after it runs.
    ///
    /// With a `path_map`, the returned key is looked up there (falling back to
    /// the key itself); without one the key is the next node id.
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        path: ConditionalRouterFn<S>,
        path_map: Option<HashMap<String, String>>,
    ) -> &mut Self {
        self.conditional_edges
            .insert(source.into(), ConditionalRouter::new(path, path_map));
        self
    }

    /// Validates the wiring and freezes the graph.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
        }
        for (source, router) in &self.conditional_edges {
            if !self.nodes.contains_key(source) {
                return Err(CompilationError::NodeNotFound(source.clone()));
            }
            if let Some(bad) = router
                .targets()
                .find(|t| t.as_str() != END && !self.nodes.contains_key(t.as_str()))
            {
                return Err(CompilationError::InvalidConditionalPathMap(bad.clone()));
            }
        }

        let mut start_targets = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t.clone());
        let first = start_targets.next().ok_or(CompilationError::MissingStart)?;
        if start_targets.next().is_some() {
            return Err(CompilationError::InvalidChain(
                "multiple edges from START (branch)".into(),
            ));
        }
        if first == END {
            return Err(CompilationError::InvalidChain("START routes straight to END".into()));
        }

        let reaches_end = self.edges.iter().any(|(_, t)| t == END)
            || self
                .conditional_edges
                .values()
                .any(|r| r.path_map.is_none() || r.targets().any(|t| t == END));
        if !reaches_end {
            return Err(CompilationError::MissingEnd);
        }

        let mut next_map: HashMap<String, NextEntry<S>> = HashMap::new();
        for (from, to) in self.edges.iter().filter(|(f, _)| f != START) {
            if next_map
                .insert(from.clone(), NextEntry::Unconditional(to.clone()))
                .is_some()
            {
                return Err(CompilationError::InvalidChain(format!(
                    "duplicate edge from {} (branch)",
                    from
                )));
            }
        }
        for (source, router) in self.conditional_edges {
            if next_map.contains_key(&source) {
                return Err(CompilationError::NodeHasBothEdgeAndConditional(source));
            }
            next_map.insert(source, NextEntry::Conditional(router));
        }

        let linear = next_map
            .values()
            .all(|e| matches!(e, NextEntry::Unconditional(_)));
        let mut node_order = vec![first.clone()];
        if linear {
            let mut visited: HashSet<&str> = HashSet::from([first.as_str()]);
            let mut current = first.as_str();
            while let Some(NextEntry::Unconditional(next)) = next_map.get(current) {
                if next == END {
                    break;
                }
                if !visited.insert(next.as_str()) {
                    return Err(CompilationError::InvalidChain("cycle detected".into()));
                }
                node_order.push(next.clone());
                current = next.as_str();
            }
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            first_node_id: first,
            node_order,
            next_map,
            middleware: self.middleware,
            recursion_limit: self.recursion_limit,
        })
    }
}
