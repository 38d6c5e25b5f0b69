//! Product-facing run config: working folder, thread/user identity, approval
//! policy. Merged into an infra-facing [`ReactBuildConfig`] by
//! [`to_react_build_config`] so the ReAct builder never has to know about
//! product wording.

use std::path::PathBuf;

use crate::agent::react::ReactBuildConfig;

use super::prompt::{assemble_system_prompt, ApprovalPolicy};

#[derive(Debug, Clone, Default)]
pub struct HelveConfig {
    pub working_folder: Option<PathBuf>,
    pub thread_id: Option<String>,
    pub user_id: Option<String>,
    pub approval_policy: Option<ApprovalPolicy>,
    /// Bypasses `assemble_system_prompt` entirely when set.
    pub system_prompt_override: Option<String>,
}

/// Merges `config` into `base`, filling `system_prompt` from the override or
/// from `assemble_system_prompt` when a working folder is set.
pub fn to_react_build_config(config: &HelveConfig, base: ReactBuildConfig) -> ReactBuildConfig {
    let system_prompt = config.system_prompt_override.clone().or_else(|| {
        config
            .working_folder
            .as_deref()
            .map(|wf| assemble_system_prompt(wf, config.approval_policy))
    });

    ReactBuildConfig {
        thread_id: config.thread_id.clone().or(base.thread_id),
        user_id: config.user_id.clone().or(base.user_id),
        working_folder: config.working_folder.clone().or(base.working_folder),
        system_prompt: system_prompt.or(base.system_prompt),
        approval_policy: config.approval_policy.or(base.approval_policy),
        ..base
    }
}
