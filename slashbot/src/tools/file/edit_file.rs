//! Edit tool: exact-match find-and-replace against a single file.
//!
//! `search` must match the file's current content exactly (no fuzzy/whitespace
//! normalization): zero matches is `PATTERN_NOT_FOUND`, more than one match
//! without `replaceAll` is `AMBIGUOUS`, and an edit that deletes more than
//! `DESTRUCTIVE_DELETE_RATIO` of the file is `DESTRUCTIVE_REJECTED`. Shared
//! `replace`/`check_not_too_destructive` helpers are reused by
//! [`MultieditTool`](super::multiedit::MultieditTool).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

use super::path::resolve_path_under;

pub const TOOL_EDIT_FILE: &str = "edit";

/// An edit that would remove more than this fraction of the file's bytes is
/// rejected outright rather than applied: a near-total deletion is far more
/// likely to be a runaway `search`/`replace` pair than an intended edit.
const DESTRUCTIVE_DELETE_RATIO: f64 = 0.8;

/// An error from [`replace`] or [`check_not_too_destructive`], carrying the
/// taxonomy code the caller maps onto [`ToolSourceError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    PatternNotFound(String),
    Ambiguous(String),
    DestructiveRejected(String),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatternNotFound(m) => write!(f, "{m}"),
            Self::Ambiguous(m) => write!(f, "{m}"),
            Self::DestructiveRejected(m) => write!(f, "{m}"),
        }
    }
}

impl From<EditError> for ToolSourceError {
    fn from(e: EditError) -> Self {
        match e {
            EditError::PatternNotFound(m) => ToolSourceError::PatternNotFound(m),
            EditError::Ambiguous(m) => ToolSourceError::Ambiguous(m),
            EditError::DestructiveRejected(m) => ToolSourceError::DestructiveRejected(m),
        }
    }
}

/// Applies one find-and-replace to `content`. `old` must occur at least once;
/// more than one occurrence requires `replace_all`, otherwise the edit is
/// ambiguous and rejected rather than guessing which one was meant. Does not
/// itself check the destructive-delete ratio; call [`check_not_too_destructive`]
/// on the result before persisting it.
pub fn replace(content: &str, old: &str, new: &str, replace_all: bool) -> Result<String, EditError> {
    if old.is_empty() {
        return Err(EditError::PatternNotFound(
            "search string must not be empty".to_string(),
        ));
    }
    let count = content.matches(old).count();
    if count == 0 {
        return Err(EditError::PatternNotFound(
            "no occurrence of the given search text".to_string(),
        ));
    }
    if count > 1 && !replace_all {
        return Err(EditError::Ambiguous(format!(
            "search text occurs {count} times; pass replaceAll=true to replace all occurrences"
        )));
    }
    if replace_all {
        Ok(content.replace(old, new))
    } else {
        Ok(content.replacen(old, new, 1))
    }
}

/// Rejects an edit whose byte count shrinks by more than
/// [`DESTRUCTIVE_DELETE_RATIO`] relative to the original.
pub fn check_not_too_destructive(before: &str, after: &str) -> Result<(), EditError> {
    if before.is_empty() {
        return Ok(());
    }
    let removed = before.len().saturating_sub(after.len());
    let ratio = removed as f64 / before.len() as f64;
    if ratio > DESTRUCTIVE_DELETE_RATIO {
        return Err(EditError::DestructiveRejected(format!(
            "edit deletes {:.0}% of the file; exceeds the {:.0}% limit",
            ratio * 100.0,
            DESTRUCTIVE_DELETE_RATIO * 100.0
        )));
    }
    Ok(())
}

pub struct EditFileTool {
    pub(crate) working_folder: Arc<std::path::PathBuf>,
}

impl EditFileTool {
    pub fn new(working_folder: Arc<std::path::PathBuf>) -> Self {
        Self { working_folder }
    }
}

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        TOOL_EDIT_FILE
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_EDIT_FILE.to_string(),
            description: Some(
                "Replace an exact occurrence of `search` with `replace` in a file. Fails with \
                 PATTERN_NOT_FOUND if absent, AMBIGUOUS if it occurs more than once and \
                 replaceAll is not set, DESTRUCTIVE_REJECTED if the edit deletes most of the file."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "File path relative to working folder." },
                    "search": { "type": "string", "description": "Exact text to find." },
                    "replace": { "type": "string", "description": "Replacement text." },
                    "replaceAll": { "type": "boolean", "default": false }
                },
                "required": ["path", "search", "replace"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let path_param = args
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing path".to_string()))?;
        let search = args
            .get("search")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing search".to_string()))?;
        let replace_with = args
            .get("replace")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing replace".to_string()))?;
        let replace_all = args
            .get("replaceAll")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let path = resolve_path_under(self.working_folder.as_ref(), path_param)?;
        if !path.is_file() {
            return Err(ToolSourceError::NotFound(format!(
                "file not found: {}",
                path.display()
            )));
        }
        let before_content = std::fs::read_to_string(&path)
            .map_err(|e| ToolSourceError::Transport(format!("failed to read file: {e}")))?;

        let after_content = replace(&before_content, search, replace_with, replace_all)?;
        check_not_too_destructive(&before_content, &after_content)?;

        std::fs::write(&path, &after_content)
            .map_err(|e| ToolSourceError::Transport(format!("failed to write file: {e}")))?;

        if let Some(ctx) = ctx {
            ctx.emit_custom(json!({
                "event": "edit:applied",
                "path": path.display().to_string(),
                "beforeContent": before_content,
                "afterContent": after_content,
            }));
        }

        Ok(ToolCallContent::text(format!("edited {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_single_occurrence() {
        let out = replace("hello world", "world", "there", false).unwrap();
        assert_eq!(out, "hello there");
    }

    #[test]
    fn replace_rejects_missing_pattern() {
        let err = replace("hello world", "xyz", "there", false).unwrap_err();
        assert!(matches!(err, EditError::PatternNotFound(_)));
    }

    #[test]
    fn replace_rejects_ambiguous_without_replace_all() {
        let err = replace("a a a", "a", "b", false).unwrap_err();
        assert!(matches!(err, EditError::Ambiguous(_)));
    }

    #[test]
    fn replace_all_replaces_every_occurrence() {
        let out = replace("a a a", "a", "b", true).unwrap();
        assert_eq!(out, "b b b");
    }

    #[test]
    fn destructive_delete_over_threshold_is_rejected() {
        let before = "a".repeat(100);
        let after = "a".repeat(10);
        let err = check_not_too_destructive(&before, &after).unwrap_err();
        assert!(matches!(err, EditError::DestructiveRejected(_)));
    }

    #[test]
    fn modest_delete_under_threshold_is_allowed() {
        let before = "a".repeat(100);
        let after = "a".repeat(50);
        assert!(check_not_too_destructive(&before, &after).is_ok());
    }
}
