//! `search` action: no web-search backend is configured anywhere in this
//! system (the documented environment surface has no search API key), so
//! this always reports itself unconfigured rather than pretending to
//! search. Kept as a registered tag instead of omitted so a model that
//! reaches for `search` gets a clear "unavailable" result rather than an
//! unknown-tag parse warning.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::actions::registry::ActionExecutor;
use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};

pub const ACTION_SEARCH: &str = "search";

#[derive(Default)]
pub struct SearchAction;

impl SearchAction {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionExecutor for SearchAction {
    fn tag(&self) -> &str {
        ACTION_SEARCH
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query." }
            },
            "required": ["query"]
        })
    }

    fn description(&self) -> Option<String> {
        Some("Web search. Currently unconfigured; use `fetch` against a known URL instead.".to_string())
    }

    async fn execute(&self, _args: Value, _ctx: Option<&ToolCallContext>) -> Result<ToolCallContent, ToolSourceError> {
        Err(ToolSourceError::NotFound(
            "search has no configured backend; use fetch against a known URL instead".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_reports_unconfigured() {
        let action = SearchAction::new();
        let err = action.execute(json!({"query": "rust async"}), None).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(_)));
    }
}
