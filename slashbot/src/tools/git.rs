//! Git tool: run one `git` subcommand under the working folder.
//!
//! Thin wrapper over the same forbidden-pattern check [`bash::BashTool`]
//! uses (`git push --force`, `git reset --hard`, `git clean -fd`, …) so a
//! model reaching for `git` directly doesn't bypass the restrictions it
//! would have hit going through `bash`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::bash::forbidden_reason;
use crate::tools::shell_exec::run_command;
use crate::tools::Tool;

pub const TOOL_GIT: &str = "git";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub struct GitTool {
    working_folder: Option<Arc<std::path::PathBuf>>,
}

impl Default for GitTool {
    fn default() -> Self {
        Self::new()
    }
}

impl GitTool {
    pub fn new() -> Self {
        Self { working_folder: None }
    }

    pub fn with_working_folder(working_folder: Arc<std::path::PathBuf>) -> Self {
        Self {
            working_folder: Some(working_folder),
        }
    }
}

#[async_trait]
impl Tool for GitTool {
    fn name(&self) -> &str {
        TOOL_GIT
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_GIT.to_string(),
            description: Some(
                "Run a git subcommand under the working folder, e.g. `status` or \
                 `diff --stat`. Destructive invocations are refused."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "args": {
                        "type": "string",
                        "description": "Arguments after `git`, e.g. \"status --short\"."
                    }
                },
                "required": ["args"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let git_args = args
            .get("args")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing args".to_string()))?;

        let command = format!("git {git_args}");
        if let Some(pattern) = forbidden_reason(&command) {
            return Err(ToolSourceError::Forbidden(format!(
                "command matches disallowed pattern '{pattern}'"
            )));
        }

        let arg_list: Vec<&str> = git_args.split_whitespace().collect();
        let text = run_command(
            "git",
            &arg_list,
            self.working_folder.as_ref().map(|wf| wf.as_ref().as_path()),
            DEFAULT_TIMEOUT_SECS,
        )
        .await?;

        Ok(ToolCallContent::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_rejects_forbidden_git_command() {
        let tool = GitTool::new();
        let err = tool
            .call(json!({"args": "reset --hard HEAD~1"}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn call_runs_git_status_without_error() {
        let tool = GitTool::new();
        let result = tool.call(json!({"args": "status --short"}), None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn call_requires_args() {
        let tool = GitTool::new();
        let err = tool.call(json!({}), None).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }
}
