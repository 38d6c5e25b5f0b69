//! ReAct: graph nodes (Think, ParseActions, Act, Observe), runner, config-driven builder.
//!
//! This module provides the nodes and runner for the ReAct chain
//! think → parse_actions → act → observe, plus a config-driven builder for CLIs.
//!
//! # Main types
//!
//! - **[`ThinkNode`]**: Calls the LLM with current messages; reply may contain action tags.
//! - **[`ParseActionsNode`]**: Tokenizes action tags out of the last assistant message into tool_calls.
//! - **[`ActNode`]**: Executes tool_calls via ToolSource and fills tool_results.
//! - **[`ObserveNode`]**: Merges tool results into messages, clears tool_calls/tool_results.
//! - **[`ReactRunner`]**: Holds compiled graph, checkpointer, store, LLM, tool source.
//! - **[`ReactBuildConfig`]**: Configuration for building run context and runners.
//! - **[`ReactRunContext`]**: Built checkpointer, store, runnable_config, tool_source.
//!
//! # Builder API
//!
//! Build a [`ReactBuildConfig`] (directly, or via
//! [`crate::helve::to_react_build_config`]), then call
//! [`build_react_runner`] or [`build_react_run_context`].

mod act_node;
mod agent_tool;
mod build;
mod config;
mod observe_node;
mod parse_actions_node;
mod runner;
mod think_node;
mod with_node_logging;

pub use act_node::{
    ActNode, ErrorHandlerFn, HandleToolErrors, DEFAULT_EXECUTION_ERROR_TEMPLATE,
    DEFAULT_TOOL_ERROR_TEMPLATE, STEP_PROGRESS_EVENT_TYPE,
};
pub use agent_tool::{AgentDirectory, AgentLane, AgentSendAction, RegisteredAgent, ACTION_AGENT_SEND};
pub use build::{
    build_react_run_context, build_react_runner, build_react_runner_with_openai,
    BuildRunnerError, ReactRunContext,
};
pub use config::ReactBuildConfig;
pub use observe_node::ObserveNode;
pub use parse_actions_node::ParseActionsNode;
pub use runner::{
    build_react_initial_state, run_agent, run_react_graph_stream, ReactRunner, AgentOptions,
    RunError,
};
pub use think_node::ThinkNode;
pub use with_node_logging::WithNodeLogging;

use crate::state::ReActState;

/// Output of the tools_condition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolsConditionResult {
    /// Route to the tools execution node ("tools" or "act").
    Tools,
    /// Route to the end node ("__end__").
    End,
}

impl ToolsConditionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::End => "__end__",
        }
    }
}

/// Conditional routing after ParseActions: if tool_calls present, route to act; else end.
pub fn tools_condition(state: &ReActState) -> ToolsConditionResult {
    if state.tool_calls.is_empty() {
        ToolsConditionResult::End
    } else {
        ToolsConditionResult::Tools
    }
}


/// Default system prompt for ReAct agents. Describes the action-tag syntax
/// `ParseActionsNode` scans for, since tool calls here come from tags in
/// plain assistant text rather than a provider-native tool-call field.
pub const REACT_SYSTEM_PROMPT: &str = r#"You are an agent that follows the ReAct pattern (Reasoning + Acting).

TOOL CALLS: to use a tool, write an action tag in your reply, e.g.
<read path="notes.md"/> or <bash command="ls -la"></bash>. Attribute values
are double-quoted; a tag may be self-closing or have a body between an
opening and closing tag. Only tags for tools you were given work; emit at
most one action tag per reply, then wait for its result before continuing.

RULES:
1. THOUGHT first: decide whether you need a tool. If the question can be
   answered from what you already know, give a final answer directly with
   no tags.
2. After a tool result comes back, reason about what it tells you before
   either calling another tool or giving a final answer.
3. Be thorough but concise. Cite or summarize tool output clearly in your
   final answer. Do not fabricate results you haven't seen."#;
