//! Infra-facing config for building a [`ReactRunner`](super::ReactRunner):
//! persistence, working folder, and the LLM provider. Product-facing config
//! (working folder semantics, approval copy) lives in [`crate::helve::HelveConfig`]
//! and is merged into this type by [`crate::helve::to_react_build_config`].

use std::path::PathBuf;

use crate::compress::CompactionConfig;
use crate::helve::ApprovalPolicy;

/// Config for [`build_react_run_context`](super::build_react_run_context) and
/// [`build_react_runner`](super::build_react_runner).
#[derive(Debug, Clone, Default)]
pub struct ReactBuildConfig {
    /// Conversation/thread id. When set, a [`crate::memory::MemorySaver`]
    /// checkpointer is attached so the run can resume across calls within
    /// the process's lifetime.
    pub thread_id: Option<String>,
    /// User id, used for store namespacing and `RunnableConfig::user_id`.
    pub user_id: Option<String>,
    /// Directory the file/bash/skill tools operate under. Required for any
    /// run that needs file access; a run with no working folder gets no
    /// file tools registered.
    pub working_folder: Option<PathBuf>,
    /// Overrides the assembled system prompt entirely when set.
    pub system_prompt: Option<String>,
    pub approval_policy: Option<ApprovalPolicy>,
    pub compaction_config: Option<CompactionConfig>,
    /// OpenAI-compatible API key for the default LLM, when no explicit
    /// `LlmClient` is passed to the builder.
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: Option<String>,
}
