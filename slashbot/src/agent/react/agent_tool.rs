//! `agent-send` action: delegates a task to a named sub-agent and runs it to
//! completion, wrapping the body in a preamble that states the issuing
//! agent's id, the target lane's policy, and the `end_task` requirement.
//!
//! ```text
//! <agent-send to="Worker" title="fix the flaky test">do X</agent-send>
//! ```
//!
//! The target agent is looked up in an [`AgentDirectory`] by its `to` id.
//! If the delegated run ends without calling `end_task` (the model just
//! stops emitting actions), the caller gets back
//! `ToolSourceError::MissingEndTask` instead of a reply.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::actions::registry::ActionExecutor;
use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError};

use super::runner::ReactRunner;

pub const ACTION_AGENT_SEND: &str = "agent-send";

/// The longest a successful delegation summary is allowed to be, per the
/// `agent-send` contract.
const MAX_SUMMARY_CHARS: usize = 2000;

/// Which policy block a named agent gets wrapped with: orchestrators may
/// only delegate/verify, workers must produce concrete evidence of the work
/// they did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentLane {
    Orchestrator,
    Worker,
}

impl AgentLane {
    fn policy_text(self) -> &'static str {
        match self {
            AgentLane::Orchestrator => {
                "You are running in an orchestrator lane: never implement a task directly. \
                 Delegate concrete work to a worker agent via `agent-send` and verify its \
                 result; call `end_task` once delegation and verification are complete."
            }
            AgentLane::Worker => {
                "You are running in a worker lane: produce concrete evidence of the work you \
                 did (files changed, commands run and their output) before calling `end_task`."
            }
        }
    }
}

/// A named sub-agent `agent-send` can delegate to.
pub struct RegisteredAgent {
    pub runner: Arc<ReactRunner>,
    pub lane: AgentLane,
}

/// Maps an agent id (as used in `<agent-send to="...">`) to a runnable
/// sub-agent. Grounded on the same keyed-registry-behind-a-lock shape
/// `kernel::Kernel`'s service/tool registries use.
#[derive(Default)]
pub struct AgentDirectory {
    agents: std::sync::RwLock<HashMap<String, RegisteredAgent>>,
}

impl AgentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, agent_id: impl Into<String>, runner: Arc<ReactRunner>, lane: AgentLane) {
        self.agents
            .write()
            .expect("agent directory lock poisoned")
            .insert(agent_id.into(), RegisteredAgent { runner, lane });
    }

    fn get(&self, agent_id: &str) -> Option<(Arc<ReactRunner>, AgentLane)> {
        self.agents
            .read()
            .expect("agent directory lock poisoned")
            .get(agent_id)
            .map(|a| (Arc::clone(&a.runner), a.lane))
    }
}

fn wrap_preamble(from_agent: &str, title: Option<&str>, lane: AgentLane, body: &str) -> String {
    let title_line = title
        .map(|t| format!("Task title: {t}\n"))
        .unwrap_or_default();
    format!(
        "You have been delegated a task by agent \"{from_agent}\".\n{title_line}{}\n\n{body}",
        lane.policy_text()
    )
}

pub struct AgentSendAction {
    directory: Arc<AgentDirectory>,
    from_agent: String,
}

impl AgentSendAction {
    pub fn new(directory: Arc<AgentDirectory>, from_agent: impl Into<String>) -> Self {
        Self {
            directory,
            from_agent: from_agent.into(),
        }
    }
}

#[async_trait]
impl ActionExecutor for AgentSendAction {
    fn tag(&self) -> &str {
        ACTION_AGENT_SEND
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "to": { "type": "string", "description": "Id of the agent to delegate to." },
                "title": { "type": "string", "description": "Short task title." },
                "body": { "type": "string", "description": "Task description for the delegated agent." }
            },
            "required": ["to", "body"]
        })
    }

    fn description(&self) -> Option<String> {
        Some("Delegate a task to another named agent and wait for its result.".to_string())
    }

    async fn execute(&self, args: Value, _ctx: Option<&ToolCallContext>) -> Result<ToolCallContent, ToolSourceError> {
        let to = args
            .get("to")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing to".to_string()))?;
        let body = args
            .get("body")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolSourceError::InvalidInput("missing body".to_string()))?;
        let title = args.get("title").and_then(|v| v.as_str());

        let (runner, lane) = self
            .directory
            .get(to)
            .ok_or_else(|| ToolSourceError::NotFound(format!("no registered agent named {to}")))?;

        let task_prompt = wrap_preamble(&self.from_agent, title, lane, body);

        let final_state = runner
            .invoke(&task_prompt)
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?;

        match final_state.final_text {
            Some(summary) => {
                let truncated: String = summary.chars().take(MAX_SUMMARY_CHARS).collect();
                Ok(ToolCallContent::text(truncated))
            }
            None => Err(ToolSourceError::MissingEndTask(format!(
                "agent {to} finished without calling end_task"
            ))),
        }
    }
}
