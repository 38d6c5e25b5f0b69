//! Individual [`Tool`] implementations and the registry/aggregation types
//! that let several of them share one [`crate::tool_source::ToolSource`].

mod aggregate_source;
pub mod bash;
pub mod end_task;
pub mod file;
pub mod fetch;
pub mod format;
pub mod git;
pub mod notify;
mod registry;
pub mod say_message;
pub(crate) mod shell_exec;
pub mod skill_install;
mod r#trait;
pub mod skill;
pub mod typecheck;

pub use aggregate_source::AggregateToolSource;
pub use bash::{BashTool, TOOL_BASH};
pub use end_task::{EndTaskTool, TOOL_END_TASK};
pub use fetch::{FetchTool, TOOL_FETCH};
pub use file::{
    EditFileTool, GlobTool, GrepTool, LsTool, MultieditTool, ReadFileTool, WriteFileTool,
    TOOL_EDIT_FILE, TOOL_GLOB, TOOL_GREP, TOOL_LS, TOOL_MULTIEDIT, TOOL_READ_FILE,
    TOOL_WRITE_FILE,
};
pub use format::{FormatTool, TOOL_FORMAT};
pub use git::{GitTool, TOOL_GIT};
pub use notify::{NotifyTool, TOOL_NOTIFY};
pub use r#trait::Tool;
pub use registry::{ToolRegistry, ToolRegistryLocked};
pub use say_message::{SayMessageTool, TOOL_SAY_MESSAGE};
pub use skill::{SkillTool, TOOL_SKILL};
pub use skill_install::{SkillInstallTool, TOOL_SKILL_INSTALL};
pub use typecheck::{TypecheckTool, TOOL_TYPECHECK};
