//! A single-tool [`ToolSource`] used as the no-config default for quick
//! demos (`run_agent("...", None)`).

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};

const TOOL_GET_TIME: &str = "get_time";

pub struct MockToolSource;

impl MockToolSource {
    /// A source exposing one tool, `get_time`, that returns a fixed string
    /// rather than the real clock, so demo runs are deterministic.
    pub fn get_time_example() -> Self {
        Self
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(vec![ToolSpec {
            name: TOOL_GET_TIME.to_string(),
            description: Some("Returns the current time.".to_string()),
            input_schema: serde_json::json!({ "type": "object", "properties": {} }),
        }])
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        _arguments: Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if name != TOOL_GET_TIME {
            return Err(ToolSourceError::NotFound(name.to_string()));
        }
        Ok(ToolCallContent::text("2026-07-28T00:00:00Z"))
    }

    fn set_call_context(&self, _ctx: Option<ToolCallContext>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_get_time_tool() {
        let source = MockToolSource::get_time_example();
        let tools = source.list_tools().await.unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, TOOL_GET_TIME);
    }

    #[tokio::test]
    async fn calls_get_time() {
        let source = MockToolSource::get_time_example();
        let result = source
            .call_tool("get_time", serde_json::json!({}))
            .await
            .unwrap();
        assert!(result.for_llm.contains("2026"));
    }

    #[tokio::test]
    async fn unknown_tool_errors() {
        let source = MockToolSource::get_time_example();
        let err = source
            .call_tool("missing", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(_)));
    }
}
