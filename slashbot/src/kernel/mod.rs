//! Central dispatcher: owns the action registry, the hook registry, and a
//! type-keyed service registry, and is the single place an action actually
//! runs. [`ActNode`](crate::agent::react::act_node::ActNode) calls
//! [`Kernel::run_tool`] for every parsed action instead of calling an
//! executor directly, so timeout enforcement, panic isolation, and approval
//! gating happen in exactly one place regardless of call site.

pub mod hook;

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;

use crate::actions::ActionRegistry;
use crate::error::AgentError;
use crate::tool_source::{ToolCallContent, ToolCallContext};

pub use hook::{Hook, HookFailure, HookReport};

/// Whether an action requires explicit operator sign-off before it runs,
/// and if so whether that sign-off has already been obtained. `ActNode`
/// resolves this from [`crate::helve::prompt::tools_requiring_approval`]
/// plus whatever the interrupt/resume flow recorded; `Kernel::run_tool`
/// only acts on the resulting decision, it doesn't compute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    NotRequired,
    Granted,
    Denied,
}

pub struct Kernel {
    actions: ActionRegistry,
    hooks: RwLock<HashMap<(String, String), Vec<HookEntry>>>,
    services: RwLock<HashMap<std::any::TypeId, Arc<dyn Any + Send + Sync>>>,
}

struct HookEntry {
    priority: i32,
    handler: Arc<dyn Hook>,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel {
    pub fn new() -> Self {
        Self {
            actions: ActionRegistry::new(),
            hooks: RwLock::new(HashMap::new()),
            services: RwLock::new(HashMap::new()),
        }
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Runs the action registered under `tag`, enforcing approval and a
    /// per-action timeout. A panicking executor is reported as
    /// [`AgentError::ToolExecution`] rather than unwinding into the caller.
    pub async fn run_tool(
        &self,
        tag: &str,
        args: Value,
        ctx: Option<ToolCallContext>,
        approval: Approval,
    ) -> Result<ToolCallContent, AgentError> {
        if approval == Approval::Denied {
            return Err(AgentError::Denied(format!(
                "action '{tag}' requires approval and was not granted"
            )));
        }

        let executor = self
            .actions
            .get(tag)
            .ok_or_else(|| AgentError::ToolExecution(format!("no action registered for '{tag}'")))?;

        let timeout = Duration::from_millis(executor.timeout_ms());
        let ctx_owned = ctx.clone();

        let join = tokio::spawn(async move {
            executor
                .execute(args, ctx_owned.as_ref())
                .await
                .map_err(|e| AgentError::ToolExecution(e.to_string()))
        });

        match tokio::time::timeout(timeout, join).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) if join_err.is_panic() => Err(AgentError::ToolExecution(format!(
                "action '{tag}' panicked"
            ))),
            Ok(Err(join_err)) => Err(AgentError::ToolExecution(format!(
                "action '{tag}' task failed: {join_err}"
            ))),
            Err(_) => Err(AgentError::ToolExecution(format!(
                "action '{tag}' timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }

    pub fn register_hook(
        &self,
        domain: impl Into<String>,
        event: impl Into<String>,
        priority: i32,
        handler: Arc<dyn Hook>,
    ) {
        let mut guard = self.hooks.write().expect("kernel hooks lock poisoned");
        let entries = guard.entry((domain.into(), event.into())).or_default();
        entries.push(HookEntry { priority, handler });
        entries.sort_by_key(|e| e.priority);
    }

    /// Threads `payload` through every handler registered for the exact
    /// `(domain, event)` pair, in ascending priority order. A handler that
    /// errors or overruns its own `timeout_ms` is recorded in
    /// [`HookReport::failures`] and skipped; its input payload passes
    /// through unchanged to the next handler.
    pub async fn dispatch_hook(
        &self,
        domain: &str,
        event: &str,
        payload: Value,
        ctx: Option<&ToolCallContext>,
    ) -> HookReport {
        let handlers: Vec<Arc<dyn Hook>> = {
            let guard = self.hooks.read().expect("kernel hooks lock poisoned");
            let mut entries: Vec<&HookEntry> = guard
                .get(&(domain.to_string(), event.to_string()))
                .map(|v| v.iter().collect())
                .unwrap_or_default();
            entries.sort_by_key(|e| e.priority);
            entries.into_iter().map(|e| Arc::clone(&e.handler)).collect()
        };

        let mut current = payload.clone();
        let mut failures = Vec::new();
        for handler in handlers {
            let timeout = Duration::from_millis(handler.timeout_ms());
            let event_owned = event.to_string();
            let input = current.clone();
            let ctx_owned = ctx.cloned();
            let handler_clone = Arc::clone(&handler);
            let start = std::time::Instant::now();
            let join = tokio::spawn(async move {
                handler_clone
                    .handle(&event_owned, input, ctx_owned.as_ref())
                    .await
            });

            match tokio::time::timeout(timeout, join).await {
                Ok(Ok(Ok(next))) => current = next,
                Ok(Ok(Err(message))) => failures.push(HookFailure {
                    plugin_id: handler.plugin_id().to_string(),
                    hook_id: handler.id().to_string(),
                    elapsed_ms: start.elapsed().as_millis() as u64,
                    message,
                    timed_out: false,
                }),
                Ok(Err(join_err)) => failures.push(HookFailure {
                    plugin_id: handler.plugin_id().to_string(),
                    hook_id: handler.id().to_string(),
                    elapsed_ms: start.elapsed().as_millis() as u64,
                    message: format!("hook task failed: {join_err}"),
                    timed_out: false,
                }),
                Err(_) => failures.push(HookFailure {
                    plugin_id: handler.plugin_id().to_string(),
                    hook_id: handler.id().to_string(),
                    elapsed_ms: timeout.as_millis() as u64,
                    message: format!("hook timed out after {}ms", timeout.as_millis()),
                    timed_out: true,
                }),
            }
        }

        HookReport {
            initial_payload: payload,
            final_payload: current,
            failures,
        }
    }

    pub fn register_service<T: Any + Send + Sync>(&self, service: Arc<T>) {
        self.services
            .write()
            .expect("kernel services lock poisoned")
            .insert(std::any::TypeId::of::<T>(), service);
    }

    pub fn get_service<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .read()
            .expect("kernel services lock poisoned")
            .get(&std::any::TypeId::of::<T>())
            .and_then(|service| Arc::clone(service).downcast::<T>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionExecutor;
    use crate::tool_source::ToolSourceError;
    use async_trait::async_trait;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl ActionExecutor for Echo {
        fn tag(&self) -> &str {
            "echo"
        }
        fn schema(&self) -> Value {
            json!({})
        }
        async fn execute(
            &self,
            args: Value,
            _ctx: Option<&ToolCallContext>,
        ) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent::text(args.to_string()))
        }
    }

    struct Slow;

    #[async_trait]
    impl ActionExecutor for Slow {
        fn tag(&self) -> &str {
            "slow"
        }
        fn schema(&self) -> Value {
            json!({})
        }
        fn timeout_ms(&self) -> u64 {
            10
        }
        async fn execute(
            &self,
            _args: Value,
            _ctx: Option<&ToolCallContext>,
        ) -> Result<ToolCallContent, ToolSourceError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(ToolCallContent::text("done"))
        }
    }

    #[tokio::test]
    async fn run_tool_executes_registered_action() {
        let kernel = Kernel::new();
        kernel.actions().register(Arc::new(Echo));
        let out = kernel
            .run_tool("echo", json!({"x": 1}), None, Approval::NotRequired)
            .await
            .unwrap();
        assert_eq!(out.for_llm, json!({"x": 1}).to_string());
    }

    #[tokio::test]
    async fn run_tool_denies_without_approval() {
        let kernel = Kernel::new();
        kernel.actions().register(Arc::new(Echo));
        let err = kernel
            .run_tool("echo", json!({}), None, Approval::Denied)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Denied(_)));
    }

    #[tokio::test]
    async fn run_tool_errors_on_unknown_tag() {
        let kernel = Kernel::new();
        let err = kernel
            .run_tool("missing", json!({}), None, Approval::NotRequired)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution(_)));
    }

    #[tokio::test]
    async fn run_tool_times_out_slow_action() {
        let kernel = Kernel::new();
        kernel.actions().register(Arc::new(Slow));
        let err = kernel
            .run_tool("slow", json!({}), None, Approval::NotRequired)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution(_)));
    }

    #[tokio::test]
    async fn dispatch_hook_skips_failing_handler_and_keeps_going() {
        struct Fails;
        #[async_trait]
        impl Hook for Fails {
            async fn handle(
                &self,
                _event: &str,
                _payload: Value,
                _ctx: Option<&ToolCallContext>,
            ) -> Result<Value, String> {
                Err("boom".to_string())
            }
        }
        struct AddsField;
        #[async_trait]
        impl Hook for AddsField {
            async fn handle(
                &self,
                _event: &str,
                payload: Value,
                _ctx: Option<&ToolCallContext>,
            ) -> Result<Value, String> {
                let mut payload = payload;
                payload["seen"] = json!(true);
                Ok(payload)
            }
        }

        let kernel = Kernel::new();
        kernel.register_hook("startup", "after-ui-ready", 0, Arc::new(Fails));
        kernel.register_hook("startup", "after-ui-ready", 10, Arc::new(AddsField));

        let report = kernel
            .dispatch_hook("startup", "after-ui-ready", json!({}), None)
            .await;
        assert_eq!(report.failures.len(), 1);
        assert!(!report.failures[0].timed_out);
        assert_eq!(report.final_payload["seen"], json!(true));
    }

    #[tokio::test]
    async fn dispatch_hook_is_keyed_by_domain_and_event_not_domain_alone() {
        struct AddsField;
        #[async_trait]
        impl Hook for AddsField {
            async fn handle(
                &self,
                _event: &str,
                payload: Value,
                _ctx: Option<&ToolCallContext>,
            ) -> Result<Value, String> {
                let mut payload = payload;
                payload["seen"] = json!(true);
                Ok(payload)
            }
        }

        let kernel = Kernel::new();
        kernel.register_hook("startup", "after-ui-ready", 0, Arc::new(AddsField));

        let report = kernel
            .dispatch_hook("startup", "before-shutdown", json!({}), None)
            .await;
        assert!(report.failures.is_empty());
        assert_eq!(report.final_payload, json!({}));
    }

    #[tokio::test]
    async fn dispatch_hook_records_timeout_as_a_failure() {
        struct Slow;
        #[async_trait]
        impl Hook for Slow {
            fn timeout_ms(&self) -> u64 {
                10
            }
            async fn handle(
                &self,
                _event: &str,
                payload: Value,
                _ctx: Option<&ToolCallContext>,
            ) -> Result<Value, String> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(payload)
            }
        }

        let kernel = Kernel::new();
        kernel.register_hook("startup", "after-ui-ready", 0, Arc::new(Slow));

        let report = kernel
            .dispatch_hook("startup", "after-ui-ready", json!({}), None)
            .await;
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].timed_out);
    }

    struct Counter(std::sync::atomic::AtomicU32);

    #[tokio::test]
    async fn services_round_trip_by_type() {
        let kernel = Kernel::new();
        kernel.register_service(Arc::new(Counter(std::sync::atomic::AtomicU32::new(7))));
        let svc = kernel.get_service::<Counter>().unwrap();
        assert_eq!(svc.0.load(std::sync::atomic::Ordering::SeqCst), 7);
    }
}
