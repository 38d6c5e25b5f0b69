//! Observe node: folds `state.tool_results` back into the transcript as a
//! single context-feed message, then clears the turn's scratch fields so the
//! next Think call sees a clean slate. Also the point where an `end_task`
//! result, if present, is turned into `state.final_text` and the graph is
//! routed to end instead of looping back through `compress`.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::Next;
use crate::message::Message;
use crate::state::{ReActState, ToolResult};
use crate::Node;

const TRUNCATION_MARKER: &str = "\n…(truncated)";

/// Name of the non-executing sentinel action that terminates a turn; see
/// `build::tool_source`, where it's registered so `ParseActionsNode` accepts
/// the tag and `ActNode` produces a plain echo result for it.
pub const END_TASK_TOOL: &str = "end_task";

/// Chars kept from an `end_task` message when it becomes the turn's final text.
const FINAL_TEXT_SUMMARY_CAP: usize = 2000;

const DIRECTIVE_ON_FAILURE: &str = "Fix the error and continue.";
const DIRECTIVE_ON_SUCCESS: &str = "Continue with the next step.";

/// Budget inputs for [`truncate_tool_result`], grounded on `§4.4`'s
/// `{contextLimit, toolResultMaxContextShare, toolResultHardMax,
/// toolResultMinKeep}` tuple. All units are characters, matching the raw
/// string length being truncated.
#[derive(Debug, Clone, Copy)]
pub struct TruncationConfig {
    pub context_limit: usize,
    pub tool_result_max_context_share: f64,
    pub tool_result_hard_max: usize,
    pub tool_result_min_keep: usize,
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            context_limit: 128_000,
            tool_result_max_context_share: 0.25,
            tool_result_hard_max: 4000,
            tool_result_min_keep: 500,
        }
    }
}

/// `available = max(minKeep, min(hardMax, maxContextShare * contextLimit - occupied))`.
/// Returns the content unchanged if it already fits; otherwise truncates at a
/// char boundary (never a byte index that could land mid-codepoint) and
/// appends the truncation marker.
pub fn truncate_tool_result(content: &str, occupied: usize, config: &TruncationConfig) -> String {
    let share_budget = (config.tool_result_max_context_share * config.context_limit as f64)
        - occupied as f64;
    let share_budget = if share_budget < 0.0 { 0.0 } else { share_budget as usize };
    let available = config
        .tool_result_min_keep
        .max(config.tool_result_hard_max.min(share_budget));

    let len = content.chars().count();
    if len <= available {
        return content.to_string();
    }

    let keep_chars = available.saturating_sub(TRUNCATION_MARKER.chars().count());
    let head: String = content.chars().take(keep_chars).collect();
    format!("{head}{TRUNCATION_MARKER}")
}

/// Truncates `message` to at most `max_chars` Unicode scalar values, at a
/// char boundary, with no marker appended (used for `end_task` summaries,
/// which are a hard cap rather than a "this was cut" notice).
fn truncate_chars(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    message.chars().take(max_chars).collect()
}

pub struct ObserveNode {
    loop_back: bool,
    truncation: TruncationConfig,
}

impl ObserveNode {
    /// Routes back into the think/act loop via `Next::Continue` (the edge to
    /// the next node, typically `compress`, is wired by the caller's graph)
    /// unless an `end_task` result is present, in which case it always ends.
    pub fn with_loop() -> Self {
        Self {
            loop_back: true,
            truncation: TruncationConfig::default(),
        }
    }

    /// Ends the run after observing, instead of looping. Used by callers that
    /// want a single think/act/observe pass with no further turns.
    pub fn terminal() -> Self {
        Self {
            loop_back: false,
            truncation: TruncationConfig::default(),
        }
    }

    pub fn with_truncation_config(mut self, config: TruncationConfig) -> Self {
        self.truncation = config;
        self
    }

    fn context_occupancy(&self, state: &ReActState) -> usize {
        state.messages.iter().map(|m| m.content().len()).sum()
    }

    fn end_task_result(state: &ReActState) -> Option<&ToolResult> {
        state
            .tool_results
            .iter()
            .find(|r| r.name == END_TASK_TOOL && !r.is_error)
    }

    fn render_feed(&self, state: &ReActState, occupied: usize) -> String {
        let mut blocks = Vec::with_capacity(state.tool_results.len());
        for result in &state.tool_results {
            let mark = if result.is_error { "✗" } else { "✓" };
            let content = truncate_tool_result(&result.content, occupied, &self.truncation);
            blocks.push(format!("[{mark}] {}\n{}", result.name, content));
        }
        let any_failed = state.tool_results.iter().any(|r| r.is_error);
        let directive = if any_failed {
            DIRECTIVE_ON_FAILURE
        } else {
            DIRECTIVE_ON_SUCCESS
        };
        blocks.push(directive.to_string());
        blocks.join("\n\n")
    }
}

#[async_trait]
impl Node<ReActState> for ObserveNode {
    fn id(&self) -> &str {
        "observe"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        if let Some(end_task) = Self::end_task_result(&state) {
            let final_text = truncate_chars(&end_task.content, FINAL_TEXT_SUMMARY_CAP);
            return Ok((
                ReActState {
                    tool_calls: Vec::new(),
                    tool_results: Vec::new(),
                    turn_count: state.turn_count + 1,
                    approval_result: None,
                    final_text: Some(final_text),
                    ..state
                },
                Next::End,
            ));
        }

        if state.tool_results.is_empty() {
            return Ok((
                ReActState {
                    turn_count: state.turn_count + 1,
                    ..state
                },
                if self.loop_back {
                    Next::Continue
                } else {
                    Next::End
                },
            ));
        }

        let occupied = self.context_occupancy(&state);
        let feed = self.render_feed(&state, occupied);
        let mut messages = state.messages;
        messages.push(Message::user(feed));

        Ok((
            ReActState {
                messages,
                tool_calls: Vec::new(),
                tool_results: Vec::new(),
                turn_count: state.turn_count + 1,
                approval_result: None,
                ..state
            },
            if self.loop_back {
                Next::Continue
            } else {
                Next::End
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(results: Vec<ToolResult>) -> ReActState {
        ReActState {
            messages: vec![Message::user("hi")],
            tool_calls: vec![],
            tool_results: results,
            turn_count: 0,
            approval_result: Some(true),
            usage: None,
            total_usage: None,
            message_count_after_last_think: None,
            final_text: None,
            read_paths_seen: Default::default(),
            duplicate_read_count: 0,
        }
    }

    #[tokio::test]
    async fn folds_results_into_a_user_message() {
        let node = ObserveNode::with_loop();
        let state = state_with(vec![ToolResult {
            call_id: "1".into(),
            name: "read".into(),
            content: "file contents".into(),
            is_error: false,
        }]);
        let (new_state, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::Continue);
        assert_eq!(new_state.messages.len(), 2);
        assert!(new_state.tool_calls.is_empty());
        assert!(new_state.tool_results.is_empty());
        assert_eq!(new_state.turn_count, 1);
        assert_eq!(new_state.approval_result, None);
    }

    #[tokio::test]
    async fn marks_errors_with_a_cross_and_failure_directive() {
        let node = ObserveNode::with_loop();
        let state = state_with(vec![ToolResult {
            call_id: "1".into(),
            name: "bash".into(),
            content: "boom".into(),
            is_error: true,
        }]);
        let (new_state, _) = node.run(state).await.unwrap();
        let Message::User(text) = new_state.messages.last().unwrap() else {
            panic!("expected user message");
        };
        assert!(text.contains("✗"));
        assert!(text.contains("bash"));
        assert!(text.ends_with("Fix the error and continue."));
    }

    #[tokio::test]
    async fn success_only_results_append_continue_directive() {
        let node = ObserveNode::with_loop();
        let state = state_with(vec![ToolResult {
            call_id: "1".into(),
            name: "read".into(),
            content: "ok".into(),
            is_error: false,
        }]);
        let (new_state, _) = node.run(state).await.unwrap();
        let Message::User(text) = new_state.messages.last().unwrap() else {
            panic!("expected user message");
        };
        assert!(text.ends_with("Continue with the next step."));
    }

    #[tokio::test]
    async fn no_results_still_advances_turn_count_without_new_message() {
        let node = ObserveNode::with_loop();
        let state = state_with(vec![]);
        let (new_state, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::Continue);
        assert_eq!(new_state.messages.len(), 1);
        assert_eq!(new_state.turn_count, 1);
    }

    #[tokio::test]
    async fn terminal_ends_instead_of_continuing() {
        let node = ObserveNode::terminal();
        let state = state_with(vec![]);
        let (_, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::End);
    }

    #[tokio::test]
    async fn truncates_long_results_with_exact_marker() {
        let node = ObserveNode::with_loop();
        let long = "x".repeat(10_000);
        let state = state_with(vec![ToolResult {
            call_id: "1".into(),
            name: "read".into(),
            content: long,
            is_error: false,
        }]);
        let (new_state, _) = node.run(state).await.unwrap();
        let Message::User(text) = new_state.messages.last().unwrap() else {
            panic!("expected user message");
        };
        assert!(text.contains(TRUNCATION_MARKER));
    }

    #[tokio::test]
    async fn end_task_result_ends_turn_with_final_text() {
        let node = ObserveNode::with_loop();
        let state = state_with(vec![ToolResult {
            call_id: "1".into(),
            name: "end_task".into(),
            content: "all done".into(),
            is_error: false,
        }]);
        let (new_state, next) = node.run(state).await.unwrap();
        assert_eq!(next, Next::End);
        assert_eq!(new_state.final_text.as_deref(), Some("all done"));
        assert!(new_state.tool_results.is_empty());
    }

    #[tokio::test]
    async fn end_task_message_is_capped_at_summary_length() {
        let node = ObserveNode::with_loop();
        let long = "y".repeat(FINAL_TEXT_SUMMARY_CAP + 500);
        let state = state_with(vec![ToolResult {
            call_id: "1".into(),
            name: "end_task".into(),
            content: long,
            is_error: false,
        }]);
        let (new_state, _) = node.run(state).await.unwrap();
        assert_eq!(
            new_state.final_text.unwrap().chars().count(),
            FINAL_TEXT_SUMMARY_CAP
        );
    }

    #[test]
    fn truncate_tool_result_respects_hard_max() {
        let config = TruncationConfig {
            context_limit: 1_000_000,
            tool_result_max_context_share: 1.0,
            tool_result_hard_max: 100,
            tool_result_min_keep: 10,
        };
        let long = "a".repeat(500);
        let out = truncate_tool_result(&long, 0, &config);
        assert_eq!(out.chars().count(), 100);
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncate_tool_result_respects_min_keep_when_budget_is_negative() {
        let config = TruncationConfig {
            context_limit: 1000,
            tool_result_max_context_share: 0.1,
            tool_result_hard_max: 4000,
            tool_result_min_keep: 50,
        };
        // occupied already exceeds the share budget; available must floor at min_keep.
        let long = "a".repeat(500);
        let out = truncate_tool_result(&long, 10_000, &config);
        assert_eq!(out.chars().count(), 50);
    }

    #[test]
    fn truncate_tool_result_is_char_boundary_safe() {
        let config = TruncationConfig {
            context_limit: 1_000_000,
            tool_result_max_context_share: 1.0,
            tool_result_hard_max: 10,
            tool_result_min_keep: 5,
        };
        let content = "日本語".repeat(20);
        let out = truncate_tool_result(&content, 0, &config);
        assert!(out.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncate_tool_result_passes_through_short_content() {
        let config = TruncationConfig::default();
        let out = truncate_tool_result("short", 0, &config);
        assert_eq!(out, "short");
    }
}
