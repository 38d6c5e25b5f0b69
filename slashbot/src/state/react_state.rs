//! State carried around the think -> act -> observe -> compress loop.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::llm::LlmUsage;
use crate::message::Message;

/// A single tool invocation surfaced by the model. In this system tool
/// invocations come from parsing action tags out of assistant text (see
/// [`crate::actions::parser`]), not from a provider-native tool-call array,
/// so `arguments` holds the parsed tag's attributes/body re-serialized as
/// JSON text rather than a provider's native call payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: Option<String>,
    pub name: String,
    pub arguments: String,
}

/// Result of running one [`ToolCall`], written by Act and folded into the
/// context feed by Observe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: String,
    pub name: String,
    pub content: String,
    pub is_error: bool,
}

/// The turn loop's state. `messages` is the running transcript passed to the
/// LLM each think step; `tool_calls`/`tool_results` are the current turn's
/// in-flight action batch, cleared once Observe folds results back into
/// `messages`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReActState {
    pub messages: Vec<Message>,
    pub tool_calls: Vec<ToolCall>,
    pub tool_results: Vec<ToolResult>,
    pub turn_count: u32,
    /// Set when an action was blocked pending or denied approval; `ActNode`
    /// reads `helve::ApprovalPolicy` to decide whether to set this instead
    /// of executing.
    pub approval_result: Option<bool>,
    pub usage: Option<LlmUsage>,
    pub total_usage: Option<LlmUsage>,
    pub message_count_after_last_think: Option<usize>,
    /// Set by `ObserveNode` when an `end_task` action ran this round; its
    /// presence is what routes the graph to `END` instead of `compress`.
    pub final_text: Option<String>,
    /// Paths already passed to a `read` action this turn, tracked by
    /// `ParseActionsNode` so repeat reads of the same file are dropped
    /// instead of burning another round-trip.
    #[serde(default)]
    pub read_paths_seen: HashSet<String>,
    /// Count of `read` calls dropped as duplicates so far this turn.
    #[serde(default)]
    pub duplicate_read_count: u32,
}

impl ReActState {
    /// The final reply text for a completed run: `final_text` if the turn
    /// ended via `end_task`, else the last `Assistant` message in the
    /// transcript (the case where the model just answered with no actions).
    pub fn last_assistant_reply(&self) -> Option<String> {
        self.final_text.clone().or_else(|| {
            self.messages.iter().rev().find_map(|m| match m {
                Message::Assistant(text) => Some(text.clone()),
                _ => None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_has_no_messages() {
        let state = ReActState::default();
        assert!(state.messages.is_empty());
        assert!(state.tool_calls.is_empty());
        assert_eq!(state.turn_count, 0);
    }

    #[test]
    fn last_assistant_reply_prefers_final_text_over_transcript() {
        let mut state = ReActState {
            final_text: Some("done".to_string()),
            ..Default::default()
        };
        state.messages.push(Message::assistant("earlier reply"));
        assert_eq!(state.last_assistant_reply().as_deref(), Some("done"));
    }

    #[test]
    fn last_assistant_reply_falls_back_to_last_assistant_message() {
        let mut state = ReActState::default();
        state.messages.push(Message::assistant("first"));
        state.messages.push(Message::user("more input"));
        state.messages.push(Message::assistant("second"));
        assert_eq!(state.last_assistant_reply().as_deref(), Some("second"));
    }

    #[test]
    fn last_assistant_reply_is_none_when_nothing_to_report() {
        let state = ReActState::default();
        assert_eq!(state.last_assistant_reply(), None);
    }
}
