//! `RunnableConfig` threads thread/checkpoint identity through a graph run.

/// Identifies a conversation thread and, optionally, a specific checkpoint
/// within it. Passed to [`crate::graph::Runtime::new`] and to
/// [`crate::memory::Checkpointer`] methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnableConfig {
    pub thread_id: Option<String>,
    pub checkpoint_id: Option<String>,
    pub checkpoint_ns: String,
    pub user_id: Option<String>,
    pub resume_from_node_id: Option<String>,
}

impl RunnableConfig {
    pub fn with_thread_id(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Default::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
