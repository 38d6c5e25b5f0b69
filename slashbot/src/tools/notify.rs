//! Notify tool: emits a UI-facing notification without feeding anything
//! back to the model's own context, via the same silent-track shape
//! [`ToolCallContent::silent`] already gives every tool result.

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

pub const TOOL_NOTIFY: &str = "notify";

pub struct NotifyTool;

impl NotifyTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NotifyTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for NotifyTool {
    fn name(&self) -> &str {
        TOOL_NOTIFY
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_NOTIFY.to_string(),
            description: Some(
                "Send a short notification to the user's UI. Does not count as progress \
                 toward completing the task."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string", "description": "Notification text." }
                },
                "required": ["message"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let message = args
            .get("message")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing message".to_string()))?;

        tracing::info!(message, "notify");
        Ok(ToolCallContent::split("notified user", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_splits_for_llm_and_for_user_tracks() {
        let tool = NotifyTool::new();
        let result = tool.call(json!({"message": "build finished"}), None).await.unwrap();
        assert_eq!(result.for_llm, "notified user");
        assert_eq!(result.for_user.as_deref(), Some("build finished"));
    }
}
