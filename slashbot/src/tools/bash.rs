//! Bash tool: run one shell command under the working folder.
//!
//! Rejects a short list of clearly destructive invocations outright (force
//! push, hard reset, recursive clean, `rm` on system paths) rather than
//! routing them through the approval policy — these are never something an
//! approval should wave through.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::shell_exec::run_shell_line;
use crate::tools::Tool;

pub const TOOL_BASH: &str = "bash";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Command substrings that are refused regardless of approval policy.
const FORBIDDEN_PATTERNS: &[&str] = &[
    "git push --force",
    "git push -f",
    "git reset --hard",
    "git clean -fd",
    "git clean -df",
    "rm -rf /",
    "rm -rf /*",
    "rm -rf ~",
    "rm -rf $HOME",
];

pub(crate) fn forbidden_reason(command: &str) -> Option<&'static str> {
    FORBIDDEN_PATTERNS
        .iter()
        .find(|p| command.contains(*p))
        .copied()
}

pub struct BashTool {
    working_folder: Option<Arc<std::path::PathBuf>>,
}

impl Default for BashTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BashTool {
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
impl Tool for BashTool {
    fn name(&self) -> &str {
        TOOL_BASH
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_BASH.to_string(),
            description: Some(
                "Run a shell command under the working folder. Destructive git/rm \
                 invocations are refused. Use `background: true` for long-running commands; \
                 the call returns immediately with a pid."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "command": { "type": "string", "description": "Shell command to run." },
                    "background": {
                        "type": "boolean",
                        "description": "Run detached and return immediately with a pid.",
                        "default": false
                    },
                    "timeoutSecs": {
                        "type": "integer",
                        "description": "Foreground timeout in seconds (default 120).",
                        "minimum": 1
                    }
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

        if let Some(pattern) = forbidden_reason(command) {
            return Err(ToolSourceError::Forbidden(format!(
                "command matches disallowed pattern '{pattern}'"
            )));
        }

        let background = args
            .get("background")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if background {
            let mut cmd = tokio::process::Command::new("sh");
            cmd.arg("-c").arg(command);
            if let Some(wf) = &self.working_folder {
                cmd.current_dir(wf.as_ref());
            }
            let child = cmd
                .spawn()
                .map_err(|e| ToolSourceError::Transport(format!("failed to spawn: {e}")))?;
            let pid = child.id().unwrap_or(0);
            std::mem::forget(child);
            return Ok(ToolCallContent::text(format!(
                "started in background, pid={pid}"
            )));
        }

        let timeout_secs = args
            .get("timeoutSecs")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let text = run_shell_line(
            command,
            self.working_folder.as_ref().map(|wf| wf.as_ref().as_path()),
            timeout_secs,
        )
        .await?;

        Ok(ToolCallContent::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_reason_matches_force_push() {
        assert!(forbidden_reason("git push --force origin main").is_some());
    }

    #[test]
    fn forbidden_reason_allows_plain_commands() {
        assert!(forbidden_reason("ls -la").is_none());
    }

    #[tokio::test]
    async fn call_rejects_forbidden_command() {
        let tool = BashTool::new();
        let err = tool
            .call(json!({"command": "git reset --hard HEAD~1"}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn call_runs_simple_command() {
        let tool = BashTool::new();
        let result = tool.call(json!({"command": "echo hi"}), None).await.unwrap();
        assert!(result.for_llm.contains("hi"));
    }
}
