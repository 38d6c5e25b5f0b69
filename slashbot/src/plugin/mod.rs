//! Plugins: units that register actions, hooks, and services against a
//! [`Kernel`] at startup. Modeled on [`crate::tools::Tool`]'s shape (a small
//! trait plus a context handed in by the caller) rather than on any
//! particular host application's plugin API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::kernel::Kernel;

#[derive(Debug, Clone)]
pub struct PluginManifest {
    pub name: String,
    /// Lower loads first. Ties broken by registration order.
    pub priority: i32,
}

pub struct PluginContext {
    pub kernel: Arc<Kernel>,
}

#[async_trait]
pub trait Plugin: Send + Sync {
    fn manifest(&self) -> PluginManifest;

    /// Register actions/hooks/services against `ctx.kernel`. Called once,
    /// in ascending manifest-priority order, before any `activate()` call.
    async fn setup(&self, ctx: &PluginContext) -> Result<(), AgentError>;

    /// Called after every plugin has completed `setup`. Default is a no-op;
    /// override for plugins that need to kick off background work (a
    /// scheduler poll loop, a connector's long-lived session) once the
    /// full kernel surface is known to be registered.
    async fn activate(&self, _ctx: &PluginContext) -> Result<(), AgentError> {
        Ok(())
    }

    /// Called on shutdown, in descending manifest-priority order (the
    /// reverse of load order). Default is a no-op.
    async fn deactivate(&self, _ctx: &PluginContext) -> Result<(), AgentError> {
        Ok(())
    }
}

impl Kernel {
    /// Loads `plugins` in ascending manifest-priority order: every plugin's
    /// `setup` runs before any plugin's `activate`, so a plugin that
    /// registers a service in `setup` can be depended on by another
    /// plugin's `activate` regardless of relative priority.
    pub async fn init_plugins(
        self: &Arc<Self>,
        mut plugins: Vec<Arc<dyn Plugin>>,
    ) -> Result<(), AgentError> {
        plugins.sort_by_key(|p| p.manifest().priority);
        let ctx = PluginContext {
            kernel: Arc::clone(self),
        };

        for plugin in &plugins {
            plugin.setup(&ctx).await?;
        }
        for plugin in &plugins {
            plugin.activate(&ctx).await?;
        }
        self.dispatch_hook("lifecycle", "after-ui-ready", serde_json::json!({}), None)
            .await;
        Ok(())
    }

    pub async fn shutdown_plugins(
        self: &Arc<Self>,
        mut plugins: Vec<Arc<dyn Plugin>>,
    ) -> Result<(), AgentError> {
        plugins.sort_by_key(|p| std::cmp::Reverse(p.manifest().priority));
        let ctx = PluginContext {
            kernel: Arc::clone(self),
        };
        for plugin in &plugins {
            plugin.deactivate(&ctx).await?;
        }
        Ok(())
    }
}
