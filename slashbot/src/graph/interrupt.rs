//! Human-in-the-loop interrupts: a node can raise one to pause a run for
//! approval (see `helve::ApprovalPolicy`) before continuing.

use async_trait::async_trait;
use serde_json::Value;

/// Raised by a node to pause the run. Carries whatever context the handler
/// needs to decide (or surface to a human) whether to resume.
#[derive(Debug, Clone)]
pub struct Interrupt {
    pub node_id: String,
    pub reason: String,
    pub payload: Value,
}

impl Interrupt {
    pub fn new(node_id: impl Into<String>, reason: impl Into<String>, payload: Value) -> Self {
        Self {
            node_id: node_id.into(),
            reason: reason.into(),
            payload,
        }
    }
}

/// What happens after an interrupt is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphInterrupt {
    /// Resume with the given replacement payload (e.g. an approval decision).
    Resume(String),
    /// Abort the run; the interrupt's reason becomes the run's error.
    Abort,
}

/// Decides what to do when a node raises an [`Interrupt`].
#[async_trait]
pub trait InterruptHandler: Send + Sync {
    async fn handle(&self, interrupt: &Interrupt) -> GraphInterrupt;
}

/// Always aborts; used when no interactive handler is configured.
pub struct DefaultInterruptHandler;

#[async_trait]
impl InterruptHandler for DefaultInterruptHandler {
    async fn handle(&self, _interrupt: &Interrupt) -> GraphInterrupt {
        GraphInterrupt::Abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_handler_always_aborts() {
        let handler = DefaultInterruptHandler;
        let interrupt = Interrupt::new("act", "approval required", Value::Null);
        assert_eq!(handler.handle(&interrupt).await, GraphInterrupt::Abort);
    }
}
