//! Tool-calling surface: the trait actions are executed through, plus the
//! error and content types that travel across that boundary. Kept separate
//! from `actions` so `kernel::Kernel` can wrap either a plain `ToolSource`
//! (legacy-style tools) or an `actions::ActionRegistry` (tag-based actions)
//! behind the same call contract.

mod bash_tools_source;
mod context;
mod mock;

pub use bash_tools_source::{BashToolsSource, TOOL_BASH};
pub use context::ToolCallContext;
pub use mock::MockToolSource;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Description of a tool/action: name, human description, and a JSON schema
/// for its arguments.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Result of a tool call, split across two independent output tracks: what
/// the model sees (`for_llm`, always present, the only track that counts
/// toward context budget) and what a human watching the session sees
/// (`for_user`, defaults to `for_llm` when a tool has nothing separate to
/// say; suppressed entirely when `silent` is set, e.g. for a tool whose only
/// job is to mutate state the user already watches through another channel).
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    pub for_llm: String,
    pub for_user: Option<String>,
    pub silent: bool,
}

impl ToolCallContent {
    /// Plain text shown identically on both tracks. The common case: most
    /// tools have nothing to say to a human that differs from what they tell
    /// the model.
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        Self {
            for_user: Some(s.clone()),
            for_llm: s,
            silent: false,
        }
    }

    /// Distinct text per track, e.g. a verbose diff for the model and a
    /// one-line confirmation for the user.
    pub fn split(for_llm: impl Into<String>, for_user: impl Into<String>) -> Self {
        Self {
            for_llm: for_llm.into(),
            for_user: Some(for_user.into()),
            silent: false,
        }
    }

    /// Text for the model only; nothing is surfaced to the user-facing track.
    pub fn silent(for_llm: impl Into<String>) -> Self {
        Self {
            for_llm: for_llm.into(),
            for_user: None,
            silent: true,
        }
    }

    /// The text a human-facing transcript should render, if any.
    pub fn user_facing(&self) -> Option<&str> {
        if self.silent {
            None
        } else {
            self.for_user.as_deref().or(Some(self.for_llm.as_str()))
        }
    }
}

/// Stable machine-readable error codes. Distinct from the `ToolSourceError`
/// variant in that several variants can legitimately share one code (e.g.
/// any unrecognized filesystem failure collapses to `Io`), and this is the
/// value surfaced to the model in the `ERROR [<code>]: ...` line rather than
/// Rust's own type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    PatternNotFound,
    Ambiguous,
    DestructiveRejected,
    Forbidden,
    Timeout,
    Denied,
    MissingEndTask,
    NotFound,
    Io,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatternNotFound => "PATTERN_NOT_FOUND",
            Self::Ambiguous => "AMBIGUOUS",
            Self::DestructiveRejected => "DESTRUCTIVE_REJECTED",
            Self::Forbidden => "FORBIDDEN",
            Self::Timeout => "TIMEOUT",
            Self::Denied => "DENIED",
            Self::MissingEndTask => "MISSING_END_TASK",
            Self::NotFound => "NOT_FOUND",
            Self::Io => "IO",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("denied: {0}")]
    Denied(String),
    #[error("pattern not found: {0}")]
    PatternNotFound(String),
    #[error("ambiguous: {0}")]
    Ambiguous(String),
    #[error("destructive edit rejected: {0}")]
    DestructiveRejected(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("missing end_task: {0}")]
    MissingEndTask(String),
}

impl ToolSourceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::Unknown,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Transport(_) => ErrorCode::Io,
            Self::Denied(_) => ErrorCode::Denied,
            Self::PatternNotFound(_) => ErrorCode::PatternNotFound,
            Self::Ambiguous(_) => ErrorCode::Ambiguous,
            Self::DestructiveRejected(_) => ErrorCode::DestructiveRejected,
            Self::Forbidden(_) => ErrorCode::Forbidden,
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::MissingEndTask(_) => ErrorCode::MissingEndTask,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::InvalidInput(m)
            | Self::NotFound(m)
            | Self::Transport(m)
            | Self::Denied(m)
            | Self::PatternNotFound(m)
            | Self::Ambiguous(m)
            | Self::DestructiveRejected(m)
            | Self::Forbidden(m)
            | Self::Timeout(m)
            | Self::MissingEndTask(m) => m.clone(),
        }
    }

    /// The exact line the model sees for a failed action:
    /// `ERROR [<code>]: <message> (hint: <hint>)`, with up to 4000 chars of
    /// `raw_output` (e.g. stderr) appended when present.
    pub fn for_llm(&self, hint: &str, raw_output: Option<&str>) -> String {
        let mut out = format!("ERROR [{}]: {} (hint: {hint})", self.code(), self.message());
        if let Some(raw) = raw_output {
            const MAX_RAW: usize = 4000;
            let truncated = match raw.char_indices().nth(MAX_RAW) {
                Some((byte_idx, _)) => &raw[..byte_idx],
                None => raw,
            };
            out.push('\n');
            out.push_str(truncated);
        }
        out
    }
}

/// Tool-calling surface: list available tools, call one by name. Implemented
/// by `tools::AggregateToolSource` (name-keyed map of `Tool`) and by
/// `BashToolsSource`/individual source wrappers that delegate to it.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call_tool_with_context(name, arguments, None).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError>;

    /// Sets a default context used by `call_tool` (no explicit context passed).
    fn set_call_context(&self, ctx: Option<ToolCallContext>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_shows_identically_on_both_tracks() {
        let c = ToolCallContent::text("done");
        assert_eq!(c.for_llm, "done");
        assert_eq!(c.user_facing(), Some("done"));
    }

    #[test]
    fn silent_hides_user_facing_track() {
        let c = ToolCallContent::silent("internal detail");
        assert_eq!(c.user_facing(), None);
        assert_eq!(c.for_llm, "internal detail");
    }

    #[test]
    fn split_keeps_tracks_independent() {
        let c = ToolCallContent::split("verbose diff", "edited file.rs");
        assert_eq!(c.for_llm, "verbose diff");
        assert_eq!(c.user_facing(), Some("edited file.rs"));
    }

    #[test]
    fn error_code_matches_spec_strings() {
        assert_eq!(ErrorCode::PatternNotFound.as_str(), "PATTERN_NOT_FOUND");
        assert_eq!(ErrorCode::DestructiveRejected.as_str(), "DESTRUCTIVE_REJECTED");
        assert_eq!(ErrorCode::MissingEndTask.as_str(), "MISSING_END_TASK");
    }

    #[test]
    fn for_llm_formats_code_message_and_hint() {
        let err = ToolSourceError::PatternNotFound("no match".to_string());
        let rendered = err.for_llm("check the search text", None);
        assert_eq!(
            rendered,
            "ERROR [PATTERN_NOT_FOUND]: no match (hint: check the search text)"
        );
    }

    #[test]
    fn for_llm_truncates_raw_output_to_4000_chars() {
        let err = ToolSourceError::Forbidden("blocked".to_string());
        let raw = "x".repeat(5000);
        let rendered = err.for_llm("n/a", Some(&raw));
        let appended = rendered.rsplit('\n').next().unwrap();
        assert_eq!(appended.chars().count(), 4000);
    }
}
