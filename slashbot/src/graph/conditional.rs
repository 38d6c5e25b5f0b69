//! Conditional routing: after a node runs, a function picks the next node id
//! from the updated state, optionally remapped through a path map.

use std::collections::HashMap;
use std::sync::Arc;

/// A routing function: given the state after a node ran, returns a key used
/// to pick the next node (directly, or via a path map).
pub type ConditionalRouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

#[derive(Clone)]
pub struct ConditionalRouter<S> {
    pub path: ConditionalRouterFn<S>,
    pub path_map: Option<HashMap<String, String>>,
}

impl<S> ConditionalRouter<S> {
    pub fn new(path: ConditionalRouterFn<S>, path_map: Option<HashMap<String, String>>) -> Self {
        Self { path, path_map }
    }

    /// Resolves the next node id for `state`: runs `path`, then looks the
    /// result up in `path_map` when present, falling back to the raw key.
    pub fn resolve(&self, state: &S) -> String {
        let key = (self.path)(state);
        match &self.path_map {
            Some(map) => map.get(&key).cloned().unwrap_or(key),
            None => key,
        }
    }
}

/// One entry in the compiled graph's routing table: either a fixed next
/// node, or a conditional router resolved at run time.
#[derive(Clone)]
pub enum NextEntry<S> {
    Unconditional(String),
    Conditional(ConditionalRouter<S>),
}
