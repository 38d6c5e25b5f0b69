//! # Slashbot
//!
//! An interactive agent runtime built on a minimal, graph-based agent
//! framework: a single state struct (e.g. [`ReActState`]) flows through
//! [`Node`]s composed into a [`StateGraph`], one step per run.
//!
//! ## Design principles
//!
//! - **Single state type**: Each graph uses one state struct that all nodes
//!   read from and write to.
//! - **One step per run**: Each node implements a single step — receive
//!   state, return updated state plus routing.
//! - **Action tags, not provider tool-calling**: the model writes tool calls
//!   as tags in plain assistant text (`<read path="notes.md"/>`);
//!   [`ParseActionsNode`] tokenizes them and [`ActNode`] dispatches them
//!   through [`kernel::Kernel`], so the same action surface works across any
//!   [`LlmClient`] regardless of native function-calling support.
//!
//! ## Features
//!
//! - **State graphs**: [`StateGraph`] with conditional routing, optional
//!   node middleware, retry policies, interrupts.
//! - **ReAct loop**: think → parse_actions → act → observe
//!   ([`ThinkNode`], [`ParseActionsNode`], [`ActNode`], [`ObserveNode`]);
//!   [`ReactRunner`] and [`build_react_runner`] for config-driven builds.
//! - **Kernel & plugins**: [`kernel::Kernel`] is the single dispatch point
//!   for actions, hooks, and typed services; [`plugin::Plugin`]s register
//!   against it at startup.
//! - **Action tags**: [`actions::parse_actions`] tokenizes action tags out of
//!   assistant text; [`actions::ActionRegistry`] maps tag name to executor.
//! - **LLM integration**: [`LlmClient`] trait with [`MockLlm`] and
//!   OpenAI-compatible [`ChatOpenAI`].
//! - **Memory & checkpointing**: in-process [`MemorySaver`] and
//!   [`InMemoryStore`]; durable session state lives at the connector layer,
//!   not in this crate.
//! - **Tools**: file/bash/skill [`tools::Tool`] implementations aggregated
//!   behind one [`tool_source::ToolSource`] via [`tools::AggregateToolSource`].
//! - **Compaction**: [`compress::CompactNode`]/[`compress::PruneNode`] keep
//!   the transcript under a token budget.
//! - **Streaming**: [`stream::StreamWriter`], [`stream::StreamEvent`].
//! - **Channels**: state update strategies for [`StateGraph`] reducers.
//! - **Helve**: product-semantic config ([`HelveConfig`]), system prompt
//!   assembly ([`assemble_system_prompt`]), conversion to ReAct config
//!   ([`to_react_build_config`]), approval policy ([`ApprovalPolicy`],
//!   [`tools_requiring_approval`]).
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`], [`RunContext`].
//! - [`agent::react`]: ReAct nodes, [`ReactRunner`], [`ReactBuildConfig`], [`build_react_runner`].
//! - [`kernel`]: [`kernel::Kernel`], [`kernel::Approval`], [`kernel::Hook`].
//! - [`plugin`]: [`plugin::Plugin`], [`plugin::PluginManifest`], [`plugin::PluginContext`].
//! - [`actions`]: [`actions::parse_actions`], [`actions::ActionRegistry`].
//! - [`state`]: [`ReActState`], [`ToolCall`], [`ToolResult`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], [`ChatOpenAI`].
//! - [`memory`]: [`Checkpointer`], [`MemorySaver`], [`Store`], [`InMemoryStore`].
//! - [`tool_source`]: [`tool_source::ToolSource`], [`tool_source::ToolSpec`], [`MockToolSource`].
//! - [`tools`]: [`tools::Tool`], file/bash/skill tools, [`tools::AggregateToolSource`].
//! - [`user_message`]: [`user_message::UserMessageStore`] for per-thread history.
//! - [`paths`]: `~/.slashbot` / `./.slashbot` roots and their well-known subpaths.
//! - [`message`]: [`Message`] (System / User / Assistant).
//! - [`stream`]: [`stream::StreamWriter`], [`stream::StreamEvent`], [`stream::StreamMode`].
//! - [`compress`]: [`CompactionConfig`], compaction graph nodes.
//! - [`channels`]: [`channels::Channel`] and friends; [`channels::StateUpdater`].
//! - [`helve`]: [`HelveConfig`], [`to_react_build_config`], [`assemble_system_prompt`],
//!   [`ApprovalPolicy`], [`tools_requiring_approval`].
//!
//! Key types are re-exported at crate root.

pub mod actions;
pub mod agent;
pub mod channels;
pub mod compress;
pub mod error;
pub mod graph;
pub mod helve;
pub mod kernel;
pub mod llm;
pub mod memory;
pub mod message;
pub mod paths;
pub mod plugin;
pub mod runner_common;
pub mod scheduler;
pub mod state;
pub mod stream;
pub mod tool_source;
pub mod tools;
pub mod user_message;

pub use actions::{
    parse_actions, ActionExecutor, ActionRegistry, ContinueTaskAction, ParseOutcome, ParseWarning,
    ParsedAction, ScheduleAction, SearchAction, TaskDirectory, ACTION_CONTINUE_TASK, ACTION_SCHEDULE,
    ACTION_SEARCH,
};
pub use channels::{
    BinaryOperatorAggregate, Channel, ChannelError, EphemeralValue, FieldBasedUpdater, LastValue,
    NamedBarrierValue, StateUpdater, Topic,
};
pub use compress::CompactionConfig;
pub use error::AgentError;
pub use graph::{
    generate_dot, generate_text, CompilationError, CompiledStateGraph, DefaultInterruptHandler,
    GraphInterrupt, Interrupt, InterruptHandler, LoggingNodeMiddleware, NameNode, Next, Node,
    NodeMiddleware, RetryPolicy, RunContext, Runtime, StateGraph, END, START,
};
pub use helve::{
    assemble_system_prompt, to_react_build_config, tools_requiring_approval, ApprovalPolicy,
    HelveConfig, APPROVAL_REQUIRED_EVENT_TYPE,
};
pub use kernel::{Approval, Hook, HookFailure, HookReport, Kernel};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, ToolChoiceMode};
pub use memory::{
    Checkpoint, CheckpointError, CheckpointListItem, CheckpointMetadata, CheckpointSource,
    Checkpointer, InMemoryStore, MemorySaver, RunnableConfig, Store, StoreError, StoreSearchHit,
};
pub use message::Message;
pub use paths::PathsError;
pub use plugin::{Plugin, PluginContext, PluginManifest};
pub use agent::react::{
    build_react_initial_state, build_react_run_context, build_react_runner,
    build_react_runner_with_openai, run_agent, run_react_graph_stream, tools_condition, ActNode,
    AgentDirectory, AgentLane, AgentOptions, AgentSendAction, BuildRunnerError, ErrorHandlerFn,
    HandleToolErrors, ObserveNode, ParseActionsNode, ReactBuildConfig, ReactRunContext,
    ReactRunner, RegisteredAgent, RunError as ReactRunError, ThinkNode, ToolsConditionResult,
    WithNodeLogging, ACTION_AGENT_SEND, DEFAULT_EXECUTION_ERROR_TEMPLATE,
    DEFAULT_TOOL_ERROR_TEMPLATE, REACT_SYSTEM_PROMPT, STEP_PROGRESS_EVENT_TYPE,
};
pub use scheduler::{BodyKind, ScheduledTask, Scheduler, SchedulerError, TaskBodyRunner};
pub use state::{ReActState, ToolCall, ToolResult};
pub use stream::{
    CheckpointEvent, MessageChunk, StreamEvent, StreamMetadata, StreamMode, StreamWriter,
    ToolStreamWriter,
};
pub use tool_source::{
    BashToolsSource, ErrorCode, MockToolSource, ToolCallContent, ToolCallContext, ToolSource,
    ToolSourceError, ToolSpec, TOOL_BASH,
};
pub use tools::{
    AggregateToolSource, BashTool, EditFileTool, EndTaskTool, FetchTool, FormatTool, GitTool,
    GlobTool, GrepTool, LsTool, MultieditTool, NotifyTool, ReadFileTool, SayMessageTool,
    SkillInstallTool, SkillTool, Tool, ToolRegistry, TypecheckTool, WriteFileTool, TOOL_EDIT_FILE,
    TOOL_END_TASK, TOOL_FETCH, TOOL_FORMAT, TOOL_GIT, TOOL_GLOB, TOOL_GREP, TOOL_LS,
    TOOL_MULTIEDIT, TOOL_NOTIFY, TOOL_READ_FILE, TOOL_SAY_MESSAGE, TOOL_SKILL,
    TOOL_SKILL_INSTALL, TOOL_TYPECHECK, TOOL_WRITE_FILE,
};
pub use user_message::{NoOpUserMessageStore, UserMessageStore, UserMessageStoreError};

/// When running `cargo test -p slashbot`, initializes tracing from `RUST_LOG` so that
/// unit tests in `src/**` can print logs with `--nocapture`.
#[cfg(test)]
mod test_logging {
    use ctor::ctor;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::Layer;

    #[ctor]
    fn init() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_filter(filter),
            )
            .try_init();
    }
}
