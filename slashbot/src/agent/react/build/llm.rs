//! Builds the default LLM client when a builder caller doesn't supply one.

use async_openai::config::OpenAIConfig;

use super::error::BuildRunnerError;
use super::super::config::ReactBuildConfig;
use crate::error::AgentError;
use crate::llm::ChatOpenAI;
use crate::LlmClient;

pub(crate) async fn build_default_llm_with_tool_source(
    config: &ReactBuildConfig,
) -> Result<Box<dyn LlmClient>, BuildRunnerError> {
    let api_key = config.openai_api_key.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
        AgentError::ExecutionFailed(
            "no LlmClient supplied and no openai_api_key in config".to_string(),
        )
    })?;
    let model = config.model.as_deref().unwrap_or("gpt-4o-mini");

    let mut openai_config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = config.openai_base_url.as_deref().filter(|s| !s.is_empty()) {
        openai_config = openai_config.with_api_base(base.trim_end_matches('/'));
    }

    Ok(Box::new(ChatOpenAI::with_config(openai_config, model)))
}
