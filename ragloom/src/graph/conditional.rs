//! Conditional edges: pick the next node from the state a node produced.
//!
//! A router maps the state to a key; the key is either a node id directly or
//! is translated through a path map.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Router function: state in, routing key out.
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Routing function plus optional key → node id map.
#[derive(Clone)]
pub struct ConditionalRouter<S> {
    pub(super) path: ConditionalRouterFn<S>,
    pub(super) path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Next node id (or END) for `state`. Keys missing from the path map are used as-is.
    pub fn resolve_next(&self, state: &S) -> String {
        let key = (self.path)(state);
        match self.path_map.as_ref().and_then(|m| m.get(&key)) {
            Some(target) => target.clone(),
            None => key,
        }
    }

    /// Every target this router can name statically (path map values).
    pub(super) fn targets(&self) -> impl Iterator<Item = &String> {
        self.path_map.iter().flat_map(|m| m.values())
    }
}

/// How the compiled graph finds the node after a given node.
#[derive(Clone)]
pub enum NextEntry<S> {
    /// Fixed successor (or END). The node's returned `Next` may still jump or end early.
    Unconditional(String),
    /// Successor chosen from state by a router; the node's `Next` is ignored.
    Conditional(ConditionalRouter<S>),
}
