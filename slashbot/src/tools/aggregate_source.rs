//! Adapts a [`ToolRegistry`] into the [`ToolSource`] trait so a batch of
//! tools can be handed to `ActNode`/`kernel::Kernel` as a single source.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};

use super::registry::ToolRegistry;
use super::Tool;

/// Collects tools under one [`ToolSource`]. `register_async`/`register_sync`
/// differ only in call-site ergonomics (registration itself never blocks);
/// kept as two names because that's the shape call sites already use.
pub struct AggregateToolSource {
    registry: ToolRegistry,
    default_context: Mutex<Option<ToolCallContext>>,
}

impl Default for AggregateToolSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateToolSource {
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
            default_context: Mutex::new(None),
        }
    }

    pub async fn register_async(&self, tool: Box<dyn Tool>) {
        self.registry.register(Arc::from(tool));
    }

    pub fn register_sync(&self, tool: Box<dyn Tool>) {
        self.registry.register(Arc::from(tool));
    }
}

#[async_trait]
impl ToolSource for AggregateToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.registry.list())
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
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(arguments, ctx).await
    }

    fn set_call_context(&self, ctx: Option<ToolCallContext>) {
        *self.default_context.lock().expect("context lock poisoned") = ctx;
    }
}
