//! Shared subprocess-running helper behind `bash`/`git`/`format`/`typecheck`:
//! spawn, apply a timeout, collect stdout/stderr, and cap output length.
//! Exists once enough tools needed the exact same shape that duplicating it
//! a fourth time stopped being the simpler option.

use std::path::Path;
use std::time::Duration;

use crate::tool_source::ToolSourceError;

const MAX_OUTPUT_CHARS: usize = 30_000;

/// Runs `program` with `args` under `cwd` (if given), waiting up to
/// `timeout_secs`. Combines stdout/stderr and a trailing exit-status line
/// into one string, truncated to [`MAX_OUTPUT_CHARS`].
pub(crate) async fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout_secs: u64,
) -> Result<String, ToolSourceError> {
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), cmd.output())
        .await
        .map_err(|_| ToolSourceError::Transport(format!("{program} timed out after {timeout_secs}s")))?
        .map_err(|e| ToolSourceError::Transport(format!("failed to run {program}: {e}")))?;

    let mut text = String::new();
    text.push_str(&String::from_utf8_lossy(&output.stdout));
    if !output.stderr.is_empty() {
        text.push_str("\n[stderr]\n");
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    if !output.status.success() {
        text.push_str(&format!("\n[exit status: {}]", output.status));
    }
    if text.chars().count() > MAX_OUTPUT_CHARS {
        let truncated: String = text.chars().take(MAX_OUTPUT_CHARS).collect();
        text = format!("{truncated}\n...[truncated]");
    }
    Ok(text)
}

/// Same as [`run_command`] but via `sh -c`, for a single command-line string.
pub(crate) async fn run_shell_line(
    command: &str,
    cwd: Option<&Path>,
    timeout_secs: u64,
) -> Result<String, ToolSourceError> {
    run_command("sh", &["-c", command], cwd, timeout_secs).await
}
