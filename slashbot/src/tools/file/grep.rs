//! Grep tool: regex search across files under the working folder, using the
//! same ripgrep library stack (`grep-regex` + `grep-searcher` + `ignore`)
//! ripgrep itself is built on, instead of shelling out.

use std::sync::Arc;

use async_trait::async_trait;
use grep_regex::RegexMatcher;
use grep_searcher::sinks::UTF8;
use grep_searcher::Searcher;
use ignore::WalkBuilder;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

use super::path::resolve_path_under;

pub const TOOL_GREP: &str = "grep";

const MAX_MATCHES: usize = 200;

pub struct GrepTool {
    pub(crate) working_folder: Arc<std::path::PathBuf>,
}

impl GrepTool {
    pub fn new(working_folder: Arc<std::path::PathBuf>) -> Self {
        Self { working_folder }
    }
}

#[async_trait]
impl Tool for GrepTool {
    fn name(&self) -> &str {
        TOOL_GREP
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_GREP.to_string(),
            description: Some(
                "Search file contents for a regex pattern under the working folder. \
                 Honors .gitignore. Capped at 200 matches."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "pattern": { "type": "string", "description": "Regular expression to search for." },
                    "path": { "type": "string", "description": "Directory to search under. Default '.'." }
                },
                "required": ["pattern"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let pattern = args
            .get("pattern")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("pattern is required".to_string()))?
            .to_string();
        let path_param = args
            .get("path")
            .and_then(|v| v.as_str())
            .unwrap_or(".")
            .to_string();

        let working_folder = Arc::clone(&self.working_folder);
        let search_root = resolve_path_under(working_folder.as_ref(), &path_param)?;

        tokio::task::spawn_blocking(move || run_grep(&working_folder, &search_root, &pattern))
            .await
            .map_err(|e| ToolSourceError::Transport(format!("grep task panicked: {e}")))?
    }
}

fn run_grep(
    working_folder: &std::path::Path,
    search_root: &std::path::Path,
    pattern: &str,
) -> Result<ToolCallContent, ToolSourceError> {
    let matcher = RegexMatcher::new(pattern)
        .map_err(|e| ToolSourceError::InvalidInput(format!("invalid pattern: {e}")))?;

    let mut out = Vec::new();
    'walk: for entry in WalkBuilder::new(search_root).build() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(working_folder).unwrap_or(path);

        let mut searcher = Searcher::new();
        let found = searcher.search_path(
            &matcher,
            path,
            UTF8(|line_num, line| {
                out.push(format!("{}:{}:{}", rel.display(), line_num, line.trim_end()));
                Ok(out.len() < MAX_MATCHES)
            }),
        );
        if found.is_err() {
            continue;
        }
        if out.len() >= MAX_MATCHES {
            break 'walk;
        }
    }

    let truncated = out.len() >= MAX_MATCHES;
    let mut text = out.join("\n");
    if truncated {
        text.push_str("\n...[truncated]");
    }
    Ok(ToolCallContent::text(text))
}
