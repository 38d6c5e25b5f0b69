//! `schedule` action: registers a persistent cron-style entry against a
//! shared [`Scheduler`]. A `prompt` argument schedules an agent prompt
//! (`BodyKind::Prompt`); a `body` argument schedules a shell command
//! (`BodyKind::Shell`). Exactly one of the two is required.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::actions::registry::ActionExecutor;
use crate::memory::uuid6::uuid6;
use crate::scheduler::{BodyKind, ScheduledTask, Scheduler};
use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};

pub const ACTION_SCHEDULE: &str = "schedule";

pub struct ScheduleAction {
    scheduler: std::sync::Arc<Scheduler>,
}

impl ScheduleAction {
    pub fn new(scheduler: std::sync::Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
}

#[async_trait]
impl ActionExecutor for ScheduleAction {
    fn tag(&self) -> &str {
        ACTION_SCHEDULE
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "cron": { "type": "string", "description": "Cron expression (with seconds field)." },
                "name": { "type": "string", "description": "Human-readable task name." },
                "body": { "type": "string", "description": "Shell command to run (mutually exclusive with prompt)." },
                "prompt": { "type": "string", "description": "Agent prompt to run (mutually exclusive with body)." }
            },
            "required": ["cron", "name"]
        })
    }

    fn description(&self) -> Option<String> {
        Some("Register a recurring scheduled task, either a shell command or an agent prompt.".to_string())
    }

    async fn execute(&self, args: Value, _ctx: Option<&ToolCallContext>) -> Result<ToolCallContent, ToolSourceError> {
        let cron = args
            .get("cron")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing cron".to_string()))?
            .to_string();
        let name = args
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing name".to_string()))?
            .to_string();
        let body_arg = args.get("body").and_then(|v| v.as_str());
        let prompt_arg = args.get("prompt").and_then(|v| v.as_str());

        let (body, body_kind) = match (body_arg, prompt_arg) {
            (Some(_), Some(_)) => {
                return Err(ToolSourceError::InvalidInput(
                    "schedule takes either body or prompt, not both".to_string(),
                ))
            }
            (Some(body), None) => (body.to_string(), BodyKind::Shell),
            (None, Some(prompt)) => (prompt.to_string(), BodyKind::Prompt),
            (None, None) => {
                return Err(ToolSourceError::InvalidInput(
                    "schedule requires either body or prompt".to_string(),
                ))
            }
        };

        let task = ScheduledTask {
            id: uuid6().to_string(),
            cron,
            name: name.clone(),
            body,
            body_kind,
            enabled: true,
            last_run_at: None,
        };
        task.next_fire_after(chrono::Utc::now())
            .map_err(|e| ToolSourceError::InvalidInput(format!("invalid cron: {e}")))?;

        self.scheduler.add_task(task.clone());

        Ok(ToolCallContent::text(format!(
            "scheduled '{name}' (id={}) with cron '{}'",
            task.id, task.cron
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_requires_exactly_one_of_body_or_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = std::sync::Arc::new(Scheduler::new(dir.path().join("tasks.json")));
        let action = ScheduleAction::new(scheduler);

        let err = action
            .execute(json!({"cron": "0 0 * * * *", "name": "x"}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn execute_registers_a_shell_task() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = std::sync::Arc::new(Scheduler::new(dir.path().join("tasks.json")));
        let action = ScheduleAction::new(std::sync::Arc::clone(&scheduler));

        action
            .execute(
                json!({"cron": "0 0 * * * *", "name": "nightly", "body": "echo hi"}),
                None,
            )
            .await
            .unwrap();

        assert_eq!(scheduler.tasks().len(), 1);
        assert_eq!(scheduler.tasks()[0].name, "nightly");
    }

    #[tokio::test]
    async fn execute_rejects_invalid_cron() {
        let dir = tempfile::tempdir().unwrap();
        let scheduler = std::sync::Arc::new(Scheduler::new(dir.path().join("tasks.json")));
        let action = ScheduleAction::new(scheduler);

        let err = action
            .execute(json!({"cron": "not a cron", "name": "x", "body": "echo hi"}), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }
}
