//! System prompt assembly for Helve: working folder path, permission rules, optional approval.
//!
//! Used by the CLI/connector layer to build `ReactBuildConfig.system_prompt`
//! without embedding product copy in the ReAct layer.

use std::path::Path;

use crate::agent::react::REACT_SYSTEM_PROMPT;
use crate::tools::{TOOL_EDIT_FILE, TOOL_MULTIEDIT, TOOL_WRITE_FILE};

/// Approval policy for destructive or high-risk file operations.
///
/// When not `None`, the assembled prompt instructs the agent to output a plan
/// and wait for user confirmation before executing certain operations (e.g. delete, bulk write).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// No approval; agent may execute all file operations.
    None,
    /// Require approval only for destructive operations (edit/multi-edit/write).
    DestructiveOnly,
    /// Require approval for all file-mutating operations before executing.
    Always,
}

/// Event type for Custom stream events and Interrupt value when approval is required.
/// Server or clients can show an approval UI and resume with `{ "approved": true }` or `{ "approved": false }`.
pub const APPROVAL_REQUIRED_EVENT_TYPE: &str = "approval_required";

/// Returns the action tags that require user approval for the given policy.
///
/// Used by [`ActNode`](crate::agent::react::ActNode) to decide whether to
/// interrupt before executing a tool.
pub fn tools_requiring_approval(policy: ApprovalPolicy) -> &'static [&'static str] {
    match policy {
        ApprovalPolicy::None => &[],
        ApprovalPolicy::DestructiveOnly => &[TOOL_EDIT_FILE, TOOL_MULTIEDIT],
        ApprovalPolicy::Always => &[TOOL_EDIT_FILE, TOOL_MULTIEDIT, TOOL_WRITE_FILE],
    }
}

/// Assembles the full system prompt for a Helve-style run: base ReAct prompt plus
/// working folder path, permission rules, and optional approval instructions.
///
/// Callers (e.g. a CLI) pass the result to `ReactBuildConfig.system_prompt`.
/// Does not perform I/O; `working_folder` is used only as display path in the prompt.
///
/// # Example
///
/// ```ignore
/// use slashbot::helve::{assemble_system_prompt, ApprovalPolicy};
/// use std::path::Path;
///
/// let prompt = assemble_system_prompt(Path::new("/tmp/workspace"), Some(ApprovalPolicy::DestructiveOnly));
/// config.system_prompt = Some(prompt);
/// ```
pub fn assemble_system_prompt(
    working_folder: &Path,
    approval_policy: Option<ApprovalPolicy>,
) -> String {
    let workdir_display = working_folder
        .canonicalize()
        .unwrap_or_else(|_| working_folder.to_path_buf())
        .display()
        .to_string();
    let workdir_section = format!(
        r#"
WORKING FOLDER & FILE RULES:
- Working folder path: {}
- You may ONLY use the provided file tools (ls, read, write, edit, multiedit, glob, grep) to operate inside this directory and its subdirectories.
- Do NOT access paths outside the working folder. Any path you use must be under the above folder.
"#,
        workdir_display
    );

    let approval_section = match approval_policy {
        Some(ApprovalPolicy::None) | None => String::new(),
        Some(ApprovalPolicy::DestructiveOnly) => "\n\nAPPROVAL: Before using edit or multiedit, output your plan and wait for the user to confirm (e.g. \"Proceed?\" or \"Continue?\"). Do not perform the edit until the user approves.".to_string(),
        Some(ApprovalPolicy::Always) => "\n\nAPPROVAL: Before using edit, multiedit, or write, output your plan and wait for the user to confirm. Do not perform these operations until the user approves.".to_string(),
    };

    format!(
        "{}{}{}",
        REACT_SYSTEM_PROMPT, workdir_section, approval_section
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_system_prompt_includes_workdir_and_base() {
        let p = assemble_system_prompt(Path::new("/tmp/ws"), None);
        assert!(p.contains(REACT_SYSTEM_PROMPT));
        assert!(p.contains("/tmp/ws"));
        assert!(p.contains("Working folder path"));
    }

    #[test]
    fn assemble_system_prompt_with_approval_destructive_adds_approval_text() {
        let p = assemble_system_prompt(Path::new("/x"), Some(ApprovalPolicy::DestructiveOnly));
        assert!(p.contains("APPROVAL"));
        assert!(p.contains("edit"));
        assert!(p.contains("wait for the user"));
    }

    #[test]
    fn assemble_system_prompt_with_approval_none_no_approval_section() {
        let p = assemble_system_prompt(Path::new("/x"), Some(ApprovalPolicy::None));
        assert!(!p.contains("APPROVAL:"));
    }

    #[test]
    fn tools_requiring_approval_always_includes_write() {
        assert!(tools_requiring_approval(ApprovalPolicy::Always).contains(&TOOL_WRITE_FILE));
    }
}
