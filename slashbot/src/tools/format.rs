//! Format tool: run a caller-supplied formatter command under the working
//! folder. No formatter is hardcoded (the spec names the tag but not a
//! fixed tool), so the command string comes from the call itself.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::shell_exec::run_shell_line;
use crate::tools::Tool;

pub const TOOL_FORMAT: &str = "format";

const TIMEOUT_SECS: u64 = 120;

pub struct FormatTool {
    working_folder: Option<Arc<std::path::PathBuf>>,
}

impl FormatTool {
    pub fn new() -> Self {
        Self { working_folder: None }
    }

    pub fn with_working_folder(working_folder: Arc<std::path::PathBuf>) -> Self {
        Self {
            working_folder: Some(working_folder),
        }
    }
}

impl Default for FormatTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FormatTool {
    fn name(&self) -> &str {
        TOOL_FORMAT
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_FORMAT.to_string(),
            description: Some(
                "Run a formatter command under the working folder, e.g. \"cargo fmt\" or \
                 \"prettier --write .\"."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "command": { "type": "string", "description": "Formatter command to run." }
                },
                "required": ["command"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let command = args
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing command".to_string()))?;

        let text = run_shell_line(
            command,
            self.working_folder.as_ref().map(|wf| wf.as_ref().as_path()),
            TIMEOUT_SECS,
        )
        .await?;

        Ok(ToolCallContent::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_requires_command() {
        let tool = FormatTool::new();
        let err = tool.call(json!({}), None).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn call_runs_the_given_command() {
        let tool = FormatTool::new();
        let result = tool.call(json!({"command": "echo formatted"}), None).await.unwrap();
        assert!(result.for_llm.contains("formatted"));
    }
}
