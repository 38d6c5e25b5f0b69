//! Builds the optional long-term [`Store`](crate::memory::Store) from config.

use std::sync::Arc;

use crate::error::AgentError;
use crate::memory::{InMemoryStore, Store};

use super::super::config::ReactBuildConfig;

/// Always returns an in-process store: this crate has no durable vector/kv
/// backend, so long-term memory only survives for the process's lifetime.
/// Kept as a function (rather than inlining `InMemoryStore::new()` at call
/// sites) so a durable backend can be slotted in later without touching
/// callers.
pub(crate) fn build_store(
    _config: &ReactBuildConfig,
) -> Result<Option<Arc<dyn Store>>, AgentError> {
    Ok(Some(Arc::new(InMemoryStore::new()) as Arc<dyn Store>))
}
