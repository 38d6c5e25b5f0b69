//! Builds checkpointer, store, runnable_config and tool_source from ReactBuildConfig.

mod context;
mod error;
mod llm;
mod store;
mod tool_source;

use std::sync::Arc;

use crate::error::AgentError;
use crate::memory::{Checkpointer, MemorySaver, RunnableConfig};
use crate::state::ReActState;
use crate::LlmClient;

use super::config::ReactBuildConfig;
use super::runner::ReactRunner;
use llm::build_default_llm_with_tool_source;
use store::build_store;
use tool_source::build_tool_source;

pub use context::ReactRunContext;
pub use error::BuildRunnerError;

/// Attaches an in-process [`MemorySaver`] when `config.thread_id` is set.
/// State only survives for the process's lifetime; durable session data
/// lives at the connector layer, not here.
fn build_checkpointer(
    config: &ReactBuildConfig,
) -> Option<Arc<dyn Checkpointer<ReActState>>> {
    config
        .thread_id
        .as_ref()
        .map(|_| Arc::new(MemorySaver::new()) as Arc<dyn Checkpointer<ReActState>>)
}

fn build_runnable_config(config: &ReactBuildConfig) -> Option<RunnableConfig> {
    if config.thread_id.is_none() && config.user_id.is_none() {
        return None;
    }
    Some(RunnableConfig {
        thread_id: config.thread_id.clone(),
        checkpoint_id: None,
        checkpoint_ns: String::new(),
        user_id: config.user_id.clone(),
        resume_from_node_id: None,
    })
}

pub async fn build_react_run_context(
    config: &ReactBuildConfig,
) -> Result<ReactRunContext, AgentError> {
    let checkpointer = build_checkpointer(config);
    let store = build_store(config)?;
    let runnable_config = build_runnable_config(config);
    let tool_source = build_tool_source(config).await?;

    Ok(ReactRunContext {
        checkpointer,
        store,
        runnable_config,
        tool_source,
    })
}

pub async fn build_react_runner(
    config: &ReactBuildConfig,
    llm: Option<Box<dyn LlmClient>>,
    verbose: bool,
) -> Result<ReactRunner, BuildRunnerError> {
    let ctx = build_react_run_context(config).await?;
    let llm = match llm {
        Some(l) => l,
        None => build_default_llm_with_tool_source(config).await?,
    };
    let runner = ReactRunner::new(
        llm,
        ctx.tool_source,
        ctx.checkpointer,
        ctx.store,
        ctx.runnable_config,
        config.system_prompt.clone(),
        config.approval_policy,
        config.compaction_config.clone(),
        None,
        verbose,
    )?;
    Ok(runner)
}

pub async fn build_react_runner_with_openai(
    config: &ReactBuildConfig,
    openai_config: async_openai::config::OpenAIConfig,
    model: impl Into<String>,
    verbose: bool,
) -> Result<ReactRunner, BuildRunnerError> {
    use crate::llm::ChatOpenAI;
    let client = ChatOpenAI::with_config(openai_config, model);
    build_react_runner(config, Some(Box::new(client)), verbose).await
}
