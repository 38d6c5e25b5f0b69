//! Hook handlers: side-channel subscribers that observe (and may rewrite) a
//! JSON payload for a specific domain/event pair without being in the main
//! action-execution path.

use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::ToolCallContext;

#[async_trait]
pub trait Hook: Send + Sync {
    /// Identifies this handler in [`HookFailure::hook_id`]. Defaults to
    /// `"anonymous"`; plugins registering more than one hook should override
    /// it so failures are attributable.
    fn id(&self) -> &str {
        "anonymous"
    }

    /// Identifies the owning plugin in [`HookFailure::plugin_id`]. Defaults
    /// to empty for hooks registered outside a plugin.
    fn plugin_id(&self) -> &str {
        ""
    }

    /// Upper bound on how long one invocation may run before the kernel
    /// cancels it and records a timed-out failure.
    fn timeout_ms(&self) -> u64 {
        5_000
    }

    /// Returns the payload to hand to the next handler, or an error string
    /// to record in [`HookReport::failures`] without halting the chain.
    async fn handle(
        &self,
        event: &str,
        payload: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<Value, String>;
}

/// One handler's outcome within a [`HookReport`]: either it errored or it
/// ran past its `timeout_ms` budget before the kernel gave up on it.
#[derive(Debug, Clone)]
pub struct HookFailure {
    pub plugin_id: String,
    pub hook_id: String,
    pub elapsed_ms: u64,
    pub message: String,
    pub timed_out: bool,
}

#[derive(Debug, Clone)]
pub struct HookReport {
    pub initial_payload: Value,
    pub final_payload: Value,
    pub failures: Vec<HookFailure>,
}
