//! Fetch tool: HTTP GET a URL and return the response body as text.

use async_trait::async_trait;
use serde_json::json;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};
use crate::tools::Tool;

pub const TOOL_FETCH: &str = "fetch";

const MAX_BODY_CHARS: usize = 30_000;
const TIMEOUT_SECS: u64 = 30;

pub struct FetchTool {
    client: reqwest::Client,
}

impl FetchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for FetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FetchTool {
    fn name(&self) -> &str {
        TOOL_FETCH
    }

    fn spec(&self) -> crate::tool_source::ToolSpec {
        crate::tool_source::ToolSpec {
            name: TOOL_FETCH.to_string(),
            description: Some("Fetch a URL over HTTP GET and return its response body as text.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "URL to fetch." }
                },
                "required": ["url"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        _ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing url".to_string()))?;

        let response = tokio::time::timeout(
            std::time::Duration::from_secs(TIMEOUT_SECS),
            self.client.get(url).send(),
        )
        .await
        .map_err(|_| ToolSourceError::Transport(format!("fetch timed out after {TIMEOUT_SECS}s")))?
        .map_err(|e| ToolSourceError::Transport(format!("fetch failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(ToolSourceError::Transport(format!(
                "fetch returned status {status}"
            )));
        }

        let mut text = body;
        if text.chars().count() > MAX_BODY_CHARS {
            let truncated: String = text.chars().take(MAX_BODY_CHARS).collect();
            text = format!("{truncated}\n...[truncated]");
        }

        Ok(ToolCallContent::text(text))
    }
}
