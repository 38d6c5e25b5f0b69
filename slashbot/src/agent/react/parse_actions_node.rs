//! Parse node: tokenizes action tags out of the last assistant message and
//! fills `state.tool_calls`, so `tools_condition` (which routes purely off
//! `tool_calls.is_empty()`) sees the same thing `ActNode` is about to run.
//! Sits between `think` and the tools/end router.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::actions::parse_actions;
use crate::error::AgentError;
use crate::graph::Next;
use crate::message::Message;
use crate::state::{ReActState, ToolCall};
use crate::tool_source::ToolSource;
use crate::Node;

/// Once this many duplicate `read` calls have been dropped in one turn,
/// stop filtering further ones: a model fixated on re-reading a file it
/// already has is better served by letting the call through (and seeing the
/// corrective message) than by silently eating every subsequent attempt.
const MAX_DUPLICATE_READS: u32 = 3;

const DUPLICATE_READ_NOTICE: &str = "You've re-read files already shown earlier in this \
conversation. Use the content already in context instead of reading them again.";

pub struct ParseActionsNode {
    tool_source: Arc<dyn ToolSource>,
}

impl ParseActionsNode {
    pub fn new(tool_source: Arc<dyn ToolSource>) -> Self {
        Self { tool_source }
    }
}

#[async_trait]
impl Node<ReActState> for ParseActionsNode {
    fn id(&self) -> &str {
        "parse_actions"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let Some(Message::Assistant(text)) = state.messages.last() else {
            return Ok((state, Next::Continue));
        };

        let known = self
            .tool_source
            .list_tools()
            .await
            .map_err(|e| AgentError::ToolExecution(e.to_string()))?;
        let known_tags: Vec<&str> = known.iter().map(|t| t.name.as_str()).collect();

        let outcome = parse_actions(text, &known_tags);
        for warning in &outcome.warnings {
            tracing::warn!(message = %warning.message, "skipped malformed action tag");
        }

        let all_calls: Vec<ToolCall> = outcome
            .actions
            .into_iter()
            .enumerate()
            .map(|(i, action)| {
                let args = if let Some(body) = action.body.clone() {
                    let mut map: serde_json::Map<String, Value> = action
                        .attributes
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect();
                    map.insert("body".to_string(), Value::String(body));
                    Value::Object(map)
                } else {
                    Value::Object(
                        action
                            .attributes
                            .into_iter()
                            .map(|(k, v)| (k, Value::String(v)))
                            .collect(),
                    )
                };
                ToolCall {
                    id: Some(format!("call_{i}")),
                    name: action.tag,
                    arguments: args.to_string(),
                }
            })
            .collect();

        let mut read_paths_seen = state.read_paths_seen;
        let mut duplicate_read_count = state.duplicate_read_count;
        let mut saw_new_duplicate = false;
        let mut tool_calls = Vec::with_capacity(all_calls.len());

        for call in all_calls {
            let read_path = if call.name == "read" {
                serde_json::from_str::<Value>(&call.arguments)
                    .ok()
                    .and_then(|v| v.get("path").and_then(|p| p.as_str()).map(str::to_string))
            } else {
                None
            };

            match read_path {
                Some(path) if duplicate_read_count < MAX_DUPLICATE_READS => {
                    if read_paths_seen.contains(&path) {
                        duplicate_read_count += 1;
                        saw_new_duplicate = true;
                        continue;
                    }
                    read_paths_seen.insert(path);
                    tool_calls.push(call);
                }
                _ => tool_calls.push(call),
            }
        }

        let mut messages = state.messages;
        if saw_new_duplicate && duplicate_read_count >= MAX_DUPLICATE_READS {
            messages.push(Message::user(DUPLICATE_READ_NOTICE));
        }

        Ok((
            ReActState {
                messages,
                tool_calls,
                read_paths_seen,
                duplicate_read_count,
                ..state
            },
            Next::Continue,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};

    struct Known(Vec<&'static str>);

    #[async_trait]
    impl ToolSource for Known {
        async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
            Ok(self
                .0
                .iter()
                .map(|n| ToolSpec {
                    name: n.to_string(),
                    description: None,
                    input_schema: Value::Null,
                })
                .collect())
        }
        async fn call_tool_with_context(
            &self,
            _name: &str,
            _arguments: Value,
            _ctx: Option<&ToolCallContext>,
        ) -> Result<ToolCallContent, ToolSourceError> {
            unimplemented!()
        }
        fn set_call_context(&self, _ctx: Option<ToolCallContext>) {}
    }

    fn state_with(text: &str) -> ReActState {
        ReActState {
            messages: vec![Message::assistant(text)],
            tool_calls: vec![],
            tool_results: vec![],
            turn_count: 0,
            approval_result: None,
            usage: None,
            total_usage: None,
            message_count_after_last_think: None,
            final_text: None,
            read_paths_seen: Default::default(),
            duplicate_read_count: 0,
        }
    }

    #[tokio::test]
    async fn fills_tool_calls_from_action_tags() {
        let node = ParseActionsNode::new(Arc::new(Known(vec!["read"])));
        let state = state_with(r#"<read path="a.rs"/>"#);
        let (new_state, _) = node.run(state).await.unwrap();
        assert_eq!(new_state.tool_calls.len(), 1);
        assert_eq!(new_state.tool_calls[0].name, "read");
    }

    #[tokio::test]
    async fn no_tags_leaves_tool_calls_empty() {
        let node = ParseActionsNode::new(Arc::new(Known(vec!["read"])));
        let state = state_with("just a plain final answer");
        let (new_state, _) = node.run(state).await.unwrap();
        assert!(new_state.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn duplicate_read_of_a_seen_path_is_dropped() {
        let node = ParseActionsNode::new(Arc::new(Known(vec!["read"])));
        let mut state = state_with(r#"<read path="a.rs"/>"#);
        state.read_paths_seen.insert("a.rs".to_string());
        let (new_state, _) = node.run(state).await.unwrap();
        assert!(new_state.tool_calls.is_empty());
        assert_eq!(new_state.duplicate_read_count, 1);
    }

    #[tokio::test]
    async fn new_read_path_is_recorded_and_kept() {
        let node = ParseActionsNode::new(Arc::new(Known(vec!["read"])));
        let state = state_with(r#"<read path="a.rs"/>"#);
        let (new_state, _) = node.run(state).await.unwrap();
        assert_eq!(new_state.tool_calls.len(), 1);
        assert!(new_state.read_paths_seen.contains("a.rs"));
    }

    #[tokio::test]
    async fn hitting_the_duplicate_threshold_injects_a_corrective_message() {
        let node = ParseActionsNode::new(Arc::new(Known(vec!["read"])));
        let mut state = state_with(r#"<read path="a.rs"/>"#);
        state.read_paths_seen.insert("a.rs".to_string());
        state.duplicate_read_count = MAX_DUPLICATE_READS - 1;
        let (new_state, _) = node.run(state).await.unwrap();
        assert_eq!(new_state.duplicate_read_count, MAX_DUPLICATE_READS);
        let Message::User(text) = new_state.messages.last().unwrap() else {
            panic!("expected corrective user message");
        };
        assert_eq!(text, DUPLICATE_READ_NOTICE);
    }
}
