//! Name-keyed map of [`Tool`]s, guarded by a single lock so registration and
//! lookup can happen concurrently with in-flight calls.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::Tool;
use crate::tool_source::ToolSpec;

/// Registry of tools by name.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.write().expect("tool registry lock poisoned").insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().expect("tool registry lock poisoned").get(name).cloned()
    }

    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools
            .read()
            .expect("tool registry lock poisoned")
            .values()
            .map(|t| t.spec())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.read().expect("tool registry lock poisoned").keys().cloned().collect()
    }
}

/// Alias kept distinct at the type level from [`ToolRegistry`] so call sites
/// that want to say "this one is shared across concurrent callers" can say
/// so, even though the lock is already internal to both.
pub type ToolRegistryLocked = ToolRegistry;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
    use async_trait::async_trait;
    use serde_json::json;

    struct Noop;

    #[async_trait]
    impl Tool for Noop {
        fn name(&self) -> &str {
            "noop"
        }
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "noop".into(),
                description: None,
                input_schema: json!({}),
            }
        }
        async fn call(
            &self,
            _args: serde_json::Value,
            _ctx: Option<&ToolCallContext>,
        ) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent::text("ok"))
        }
    }

    #[test]
    fn register_then_get_round_trips() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Noop));
        assert!(registry.get("noop").is_some());
        assert_eq!(registry.names(), vec!["noop".to_string()]);
    }

    #[test]
    fn get_missing_returns_none() {
        let registry = ToolRegistry::new();
        assert!(registry.get("missing").is_none());
    }
}
