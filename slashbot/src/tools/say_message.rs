//! Say-message tool: sends a message straight to the user without it
//! becoming part of the model's own observation (the for-llm track is a
//! short acknowledgement, not the message itself, so it doesn't get
//! re-fed into context on the next turn).

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

pub const TOOL_SAY_MESSAGE: &str = "say-message";

pub struct SayMessageTool;

impl SayMessageTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SayMessageTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SayMessageTool {
    fn name(&self) -> &str {
        TOOL_SAY_MESSAGE
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_SAY_MESSAGE.to_string(),
            description: Some(
                "Send a message straight to the user mid-task, without ending the turn. \
                 Use for progress updates; call `end_task` to finish."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string", "description": "Text to show the user." }
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

        Ok(ToolCallContent::split("message sent to user", message))
    }
}
