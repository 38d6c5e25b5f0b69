//! Act node: executes the tool calls `ParseActionsNode` put into `state.tool_calls`
//! against a [`ToolSource`], filling `state.tool_results`.
//!
//! Approval-gated actions (see [`crate::helve::ApprovalPolicy`]) are denied by
//! raising [`AgentError::Denied`] rather than being silently skipped; the
//! compiled graph turns that into an interrupt the caller can resume from.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::{Next, RunContext};
use crate::helve::{tools_requiring_approval, ApprovalPolicy};
use crate::state::{ReActState, ToolCall, ToolResult};
use crate::stream::{StreamEvent, StreamMode, ToolStreamWriter};
use crate::tool_source::{ToolCallContext, ToolSource};
use crate::Node;

pub const STEP_PROGRESS_EVENT_TYPE: &str = "step_progress";

pub const DEFAULT_TOOL_ERROR_TEMPLATE: &str = "error running {tool}: {error}";
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str = "{tool} failed: {error}";

/// Formats a tool-execution error into the text stored in `ToolResult::content`.
pub type ErrorHandlerFn = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// How Act reacts when a tool call itself returns an error (as opposed to the
/// surrounding execution machinery failing).
pub enum HandleToolErrors {
    /// Always fold the error into a `ToolResult` with `is_error: true` and keep
    /// going, using the given formatter (or [`DEFAULT_TOOL_ERROR_TEMPLATE`] when
    /// `None`) to build the result text.
    Always(Option<ErrorHandlerFn>),
    /// Propagate the first tool error as [`AgentError::ToolExecution`], aborting
    /// the run.
    Propagate,
}

impl Default for HandleToolErrors {
    fn default() -> Self {
        Self::Always(None)
    }
}

pub struct ActNode {
    tool_source: Arc<dyn ToolSource>,
    handle_tool_errors: HandleToolErrors,
    approval_policy: Option<ApprovalPolicy>,
}

impl ActNode {
    pub fn new(tool_source: Box<dyn ToolSource>) -> Self {
        Self::new_shared(Arc::from(tool_source))
    }

    /// Shares a `ToolSource` already held by another node (e.g. `ParseActionsNode`,
    /// which needs the same source's `list_tools()` to know what tags to scan for).
    pub fn new_shared(tool_source: Arc<dyn ToolSource>) -> Self {
        Self {
            tool_source,
            handle_tool_errors: HandleToolErrors::default(),
            approval_policy: None,
        }
    }

    pub fn with_handle_tool_errors(mut self, handling: HandleToolErrors) -> Self {
        self.handle_tool_errors = handling;
        self
    }

    pub fn with_approval_policy(mut self, policy: Option<ApprovalPolicy>) -> Self {
        self.approval_policy = policy;
        self
    }

    fn requires_approval(&self, name: &str) -> bool {
        match self.approval_policy {
            Some(policy) => tools_requiring_approval(policy).contains(&name),
            None => false,
        }
    }

    fn format_error(&self, tool: &str, error: &str) -> String {
        match &self.handle_tool_errors {
            HandleToolErrors::Always(Some(f)) => f(tool, error),
            HandleToolErrors::Always(None) | HandleToolErrors::Propagate => {
                DEFAULT_TOOL_ERROR_TEMPLATE
                    .replace("{tool}", tool)
                    .replace("{error}", error)
            }
        }
    }

    async fn run_one(
        &self,
        call: &ToolCall,
        ctx: &ToolCallContext,
    ) -> Result<ToolResult, AgentError> {
        let call_id = call.id.clone().unwrap_or_else(|| call.name.clone());

        if self.requires_approval(&call.name) {
            return Err(AgentError::Denied(format!(
                "action '{}' requires approval before it can run",
                call.name
            )));
        }

        let args: Value = serde_json::from_str(&call.arguments).unwrap_or(Value::Null);

        match self
            .tool_source
            .call_tool_with_context(&call.name, args, Some(ctx))
            .await
        {
            Ok(content) => Ok(ToolResult {
                call_id,
                name: call.name.clone(),
                content: content.for_llm,
                is_error: false,
            }),
            Err(e) => match &self.handle_tool_errors {
                HandleToolErrors::Propagate => Err(AgentError::ToolExecution(format!(
                    "{}: {e}",
                    call.name
                ))),
                HandleToolErrors::Always(_) => Ok(ToolResult {
                    call_id,
                    name: call.name.clone(),
                    content: self.format_error(&call.name, &e.to_string()),
                    is_error: true,
                }),
            },
        }
    }

    async fn run_all(
        &self,
        state: ReActState,
        writer: Option<&ToolStreamWriter>,
    ) -> Result<(ReActState, Next), AgentError> {
        // Approval already granted for this turn: skip the approval gate once.
        let pre_approved = state.approval_result == Some(true);

        let ctx = ToolCallContext::new(state.messages.clone());
        self.tool_source.set_call_context(Some(ctx.clone()));

        let mut results = Vec::with_capacity(state.tool_calls.len());
        for call in &state.tool_calls {
            if let Some(writer) = writer {
                writer.emit_custom(serde_json::json!({
                    "type": STEP_PROGRESS_EVENT_TYPE,
                    "tool": call.name,
                }));
            }

            if pre_approved {
                let args: Value = serde_json::from_str(&call.arguments).unwrap_or(Value::Null);
                let call_id = call.id.clone().unwrap_or_else(|| call.name.clone());
                let result = match self
                    .tool_source
                    .call_tool_with_context(&call.name, args, Some(&ctx))
                    .await
                {
                    Ok(content) => ToolResult {
                        call_id,
                        name: call.name.clone(),
                        content: content.for_llm,
                        is_error: false,
                    },
                    Err(e) => ToolResult {
                        call_id,
                        name: call.name.clone(),
                        content: self.format_error(&call.name, &e.to_string()),
                        is_error: true,
                    },
                };
                results.push(result);
                continue;
            }

            results.push(self.run_one(call, &ctx).await?);
        }

        self.tool_source.set_call_context(None);

        Ok((
            ReActState {
                tool_results: results,
                ..state
            },
            Next::Continue,
        ))
    }
}

#[async_trait]
impl Node<ReActState> for ActNode {
    fn id(&self) -> &str {
        "act"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        self.run_all(state, None).await
    }

    async fn run_with_context(
        &self,
        state: ReActState,
        ctx: &RunContext<ReActState>,
    ) -> Result<(ReActState, Next), AgentError> {
        let writer = if ctx.stream_mode.contains(&StreamMode::Custom) {
            ctx.stream_tx.clone().map(|tx| {
                ToolStreamWriter::new(move |value| {
                    tx.try_send(StreamEvent::Custom(value)).is_ok()
                })
            })
        } else {
            None
        };
        let (new_state, next) = self.run_all(state, writer.as_ref()).await?;
        if let Some(tx) = &ctx.stream_tx {
            let _ = tx
                .send(StreamEvent::Updates {
                    node_id: self.id().to_string(),
                    state: new_state.clone(),
                })
                .await;
        }
        Ok((new_state, next))
    }
}
