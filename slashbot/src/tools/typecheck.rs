//! Typecheck tool: run a caller-supplied typechecker command under the
//! working folder. No typechecker is hardcoded (the spec names the tag but
//! not a fixed tool), so the command string comes from the call itself.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::shell_exec::run_shell_line;
use crate::tools::Tool;

pub const TOOL_TYPECHECK: &str = "typecheck";

const TIMEOUT_SECS: u64 = 120;

pub struct TypecheckTool {
    working_folder: Option<Arc<std::path::PathBuf>>,
}

impl TypecheckTool {
    pub fn new() -> Self {
        Self { working_folder: None }
    }

    pub fn with_working_folder(working_folder: Arc<std::path::PathBuf>) -> Self {
        Self {
            working_folder: Some(working_folder),
        }
    }
}

impl Default for TypecheckTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TypecheckTool {
    fn name(&self) -> &str {
        TOOL_TYPECHECK
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_TYPECHECK.to_string(),
            description: Some(
                "Run a typechecker command under the working folder, e.g. \"cargo check\" or \
                 \"tsc --noEmit\"."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "command": { "type": "string", "description": "Typechecker command to run." }
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
