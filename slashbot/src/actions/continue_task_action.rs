//! `continue-task` action: sends a follow-up message into an already
//! running delegated task instead of starting a new one via `agent-send`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::actions::registry::ActionExecutor;
use crate::actions::task_directory::TaskDirectory;
use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};

pub const ACTION_CONTINUE_TASK: &str = "continue-task";

pub struct ContinueTaskAction {
    directory: Arc<TaskDirectory>,
}

impl ContinueTaskAction {
    pub fn new(directory: Arc<TaskDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl ActionExecutor for ContinueTaskAction {
    fn tag(&self) -> &str {
        ACTION_CONTINUE_TASK
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "taskId": { "type": "string", "description": "Id of the delegated task to continue." },
                "message": { "type": "string", "description": "Follow-up message for the running task." }
            },
            "required": ["taskId", "message"]
        })
    }

    fn description(&self) -> Option<String> {
        Some("Send a follow-up message into an already-running delegated task.".to_string())
    }

    async fn execute(&self, args: Value, _ctx: Option<&ToolCallContext>) -> Result<ToolCallContent, ToolSourceError> {
        let task_id = args
            .get("taskId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing taskId".to_string()))?;
        let message = args
            .get("message")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing message".to_string()))?;

        if self.directory.send(task_id, message.to_string()) {
            Ok(ToolCallContent::text(format!("continued task {task_id}")))
        } else {
            Err(ToolSourceError::NotFound(format!(
                "no running task with id {task_id}"
            )))
        }
    }
}
