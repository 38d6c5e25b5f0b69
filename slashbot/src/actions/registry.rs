//! Registry of [`ActionExecutor`]s, one per action tag. Mirrors
//! [`crate::tools::Tool`] one-for-one (`name`/`spec`/`call` becomes
//! `tag`/`schema`/`execute`) so any existing `Tool` is usable as an action
//! via the blanket impl below, and new action-only behavior (scheduling,
//! agent delegation, connector config) can implement the trait directly
//! without going through the tool-calling machinery at all.
//!
//! [`ActionRegistry`] also implements [`ToolSource`], which is what makes it
//! the thing actually sitting behind `ParseActionsNode`/`ActNode` in
//! `build_tool_source` rather than a second, parallel registry nobody calls
//! into: both nodes only ever see a `dyn ToolSource`, and `ActionRegistry`
//! fills that role instead of [`crate::tools::AggregateToolSource`] so tags
//! that exist only as actions (`schedule`, `agent-send`, …) are reachable
//! from the same turn loop as tags backed by a `Tool`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};
use crate::tools::Tool;

#[async_trait]
pub trait ActionExecutor: Send + Sync {
    fn tag(&self) -> &str;

    fn schema(&self) -> Value;

    /// Shown to the LLM alongside `schema()`. `None` omits the tag's
    /// description from the prompt rather than fabricating one.
    fn description(&self) -> Option<String> {
        None
    }

    async fn execute(
        &self,
        args: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError>;

    /// Upper bound on how long one call may run before the kernel cancels it.
    fn timeout_ms(&self) -> u64 {
        30_000
    }
}

#[async_trait]
impl<T: Tool + ?Sized> ActionExecutor for T {
    fn tag(&self) -> &str {
        self.name()
    }

    fn schema(&self) -> Value {
        self.spec().input_schema
    }

    fn description(&self) -> Option<String> {
        self.spec().description
    }

    async fn execute(
        &self,
        args: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call(args, ctx).await
    }
}

/// Adapts an `Arc<dyn Tool>` trait object into an `ActionExecutor`.
///
/// The blanket `impl<T: Tool + ?Sized> ActionExecutor for T` above already
/// covers any *concrete* tool type, but `dyn Tool -> dyn ActionExecutor` is
/// not a supertrait relationship, so an existing `Arc<dyn Tool>` can't be
/// unsized-coerced into `Arc<dyn ActionExecutor>` directly. This wrapper
/// closes that gap for callers (like `build_tool_source`) that only have
/// tools boxed as trait objects already.
struct ToolAsAction(Arc<dyn Tool>);

#[async_trait]
impl ActionExecutor for ToolAsAction {
    fn tag(&self) -> &str {
        self.0.name()
    }

    fn schema(&self) -> Value {
        self.0.spec().input_schema
    }

    fn description(&self) -> Option<String> {
        self.0.spec().description
    }

    async fn execute(&self, args: Value, ctx: Option<&ToolCallContext>) -> Result<ToolCallContent, ToolSourceError> {
        self.0.call(args, ctx).await
    }
}

/// Name-keyed map of [`ActionExecutor`]s, one per action tag.
pub struct ActionRegistry {
    executors: RwLock<HashMap<String, Arc<dyn ActionExecutor>>>,
    default_context: Mutex<Option<ToolCallContext>>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            executors: RwLock::new(HashMap::new()),
            default_context: Mutex::new(None),
        }
    }

    pub fn register(&self, executor: Arc<dyn ActionExecutor>) {
        let tag = executor.tag().to_string();
        self.executors
            .write()
            .expect("action registry lock poisoned")
            .insert(tag, executor);
    }

    /// Registers a `Tool` trait object under its own `name()`.
    pub fn register_tool(&self, tool: Arc<dyn Tool>) {
        self.register(Arc::new(ToolAsAction(tool)));
    }

    pub fn get(&self, tag: &str) -> Option<Arc<dyn ActionExecutor>> {
        self.executors
            .read()
            .expect("action registry lock poisoned")
            .get(tag)
            .cloned()
    }

    pub fn tags(&self) -> Vec<String> {
        self.executors
            .read()
            .expect("action registry lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ToolSource for ActionRegistry {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        let guard = self.executors.read().expect("action registry lock poisoned");
        Ok(guard
            .values()
            .map(|e| ToolSpec {
                name: e.tag().to_string(),
                description: e.description(),
                input_schema: e.schema(),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolCallContent, ToolSourceError> {
        let ctx = self
            .default_context
            .lock()
            .expect("context lock poisoned")
            .clone();
        self.call_tool_with_context(name, arguments, ctx.as_ref()).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let executor = self
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        executor.execute(arguments, ctx).await
    }

    fn set_call_context(&self, ctx: Option<ToolCallContext>) {
        *self.default_context.lock().expect("context lock poisoned") = ctx;
    }
}
