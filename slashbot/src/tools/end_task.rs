//! End-task tool: a non-executing sentinel an agent calls to terminate its
//! own turn and hand back a final message.
//!
//! `ObserveNode` looks for a non-error `ToolResult` named [`TOOL_END_TASK`]
//! and, when found, ends the run instead of looping back to `think` — this
//! tool doesn't need any special casing in `ActNode` for that, it just has
//! to exist and echo its `message` argument back as the result content.

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

pub const TOOL_END_TASK: &str = "end_task";

pub struct EndTaskTool;

impl EndTaskTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EndTaskTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EndTaskTool {
    fn name(&self) -> &str {
        TOOL_END_TASK
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_END_TASK.to_string(),
            description: Some(
                "Terminate the current turn and supply the final message. Call this once the \
                 task is complete; no further actions run after it."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Final summary to return to the caller."
                    }
                }
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
            .unwrap_or("")
            .to_string();
        Ok(ToolCallContent::text(message))
    }
}
