//! Builds the tool source from config: every `Tool` (file/bash/git/skill/…)
//! plus action-only executors (`schedule`, `search`, `continue-task`) behind
//! one [`ActionRegistry`], which implements [`ToolSource`] directly so
//! `ParseActionsNode`/`ActNode` pick up action-only tags with no change to
//! either node.

use std::sync::Arc;

use crate::actions::{ActionRegistry, ContinueTaskAction, ScheduleAction, SearchAction, TaskDirectory};
use crate::agent::react::{AgentDirectory, AgentSendAction};
use crate::error::AgentError;
use crate::paths;
use crate::scheduler::Scheduler;
use crate::tool_source::ToolSource;
use crate::tools::{
    BashTool, EditFileTool, EndTaskTool, FetchTool, FormatTool, GitTool, GlobTool, GrepTool,
    LsTool, MultieditTool, NotifyTool, ReadFileTool, SayMessageTool, SkillInstallTool, SkillTool,
    TypecheckTool, WriteFileTool,
};

use super::super::config::ReactBuildConfig;

pub(crate) async fn build_tool_source(
    config: &ReactBuildConfig,
) -> Result<Box<dyn ToolSource>, AgentError> {
    let registry = ActionRegistry::new();

    registry.register_tool(Arc::new(EndTaskTool::new()));
    registry.register_tool(Arc::new(FetchTool::new()));
    registry.register_tool(Arc::new(NotifyTool::new()));
    registry.register_tool(Arc::new(SayMessageTool::new()));

    let tasks_path = paths::home_root()
        .map(|root| paths::tasks_file(&root))
        .unwrap_or_else(|_| std::path::PathBuf::from(".slashbot/tasks.json"));
    let scheduler = Arc::new(Scheduler::load(tasks_path));
    registry.register(Arc::new(ScheduleAction::new(scheduler)));
    registry.register(Arc::new(SearchAction::new()));
    registry.register(Arc::new(ContinueTaskAction::new(Arc::new(TaskDirectory::new()))));

    let from_agent = config.user_id.clone().unwrap_or_else(|| "agent".to_string());
    registry.register(Arc::new(AgentSendAction::new(
        Arc::new(AgentDirectory::new()),
        from_agent,
    )));

    match &config.working_folder {
        Some(wf) => {
            let wf = Arc::new(wf.clone());
            registry.register_tool(Arc::new(BashTool::with_working_folder(Arc::clone(&wf))));
            registry.register_tool(Arc::new(GitTool::with_working_folder(Arc::clone(&wf))));
            registry.register_tool(Arc::new(FormatTool::with_working_folder(Arc::clone(&wf))));
            registry.register_tool(Arc::new(TypecheckTool::with_working_folder(Arc::clone(&wf))));
            registry.register_tool(Arc::new(ReadFileTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(WriteFileTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(EditFileTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(MultieditTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(GlobTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(GrepTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(LsTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(SkillTool::new(Arc::clone(&wf))));
            registry.register_tool(Arc::new(SkillInstallTool::new(Arc::clone(&wf))));
        }
        None => {
            registry.register_tool(Arc::new(BashTool::new()));
            registry.register_tool(Arc::new(GitTool::new()));
            registry.register_tool(Arc::new(FormatTool::new()));
            registry.register_tool(Arc::new(TypecheckTool::new()));
        }
    }

    Ok(Box::new(registry))
}
