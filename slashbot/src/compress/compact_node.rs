//! Compact node: when the context overflows, truncate older history down to
//! `compact_keep_recent` messages. No summarization — spec is explicit that
//! dropped content is gone, not rewritten by a model.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::Message;
use crate::state::ReActState;

use super::config::CompactionConfig;
use super::context_window;

pub struct CompactNode {
    pub config: CompactionConfig,
}

fn compact_messages(messages: Vec<Message>, keep_recent: usize) -> Vec<Message> {
    if messages.len() <= keep_recent {
        return messages;
    }

    let system = match messages.first() {
        Some(Message::System(_)) => Some(messages[0].clone()),
        _ => None,
    };
    let rest_start = if system.is_some() { 1 } else { 0 };
    let rest = &messages[rest_start..];

    let drop_count = rest.len().saturating_sub(keep_recent);
    let kept = &rest[drop_count..];

    let mut out = Vec::with_capacity(kept.len() + 2);
    if let Some(sys) = system {
        out.push(sys);
    }
    if drop_count > 0 {
        out.push(Message::System(format!(
            "[{} earlier message(s) dropped to fit the context window]",
            drop_count
        )));
    }
    out.extend_from_slice(kept);
    out
}

#[async_trait]
impl Node<ReActState> for CompactNode {
    fn id(&self) -> &str {
        "compact"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let overflow_input = context_window::ContextWindowCheck {
            messages: &state.messages,
            usage: state
                .usage
                .as_ref()
                .map(|u| (u.prompt_tokens, u.completion_tokens)),
            message_count_after_last_think: state.message_count_after_last_think,
            max_context_tokens: self.config.max_context_tokens,
            reserve_tokens: self.config.reserve_tokens,
        };
        let messages = if self.config.auto && context_window::is_overflow(&overflow_input) {
            compact_messages(state.messages, self.config.compact_keep_recent)
        } else {
            state.messages
        };
        Ok((ReActState { messages, ..state }, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use crate::state::ReActState;

    use super::*;

    #[tokio::test]
    async fn compact_node_id_is_compact() {
        let node = CompactNode {
            config: CompactionConfig::default(),
        };
        assert_eq!(node.id(), "compact");
    }

    #[tokio::test]
    async fn compact_node_auto_false_passes_through() {
        let node = CompactNode {
            config: CompactionConfig {
                auto: false,
                ..Default::default()
            },
        };
        let state = ReActState {
            messages: vec![Message::User("a".repeat(200_000))],
            ..Default::default()
        };
        let (out, next) = node.run(state).await.unwrap();
        assert_eq!(out.messages.len(), 1);
        assert!(matches!(next, Next::Continue));
    }

    #[tokio::test]
    async fn compact_node_auto_true_but_no_overflow_passes_through() {
        let node = CompactNode {
            config: CompactionConfig {
                auto: true,
                max_context_tokens: 200_000,
                reserve_tokens: 4096,
                ..Default::default()
            },
        };
        let state = ReActState {
            messages: vec![Message::User("short".to_string())],
            ..Default::default()
        };
        let (out, next) = node.run(state).await.unwrap();
        assert_eq!(out.messages.len(), 1);
        assert!(matches!(next, Next::Continue));
    }

    #[tokio::test]
    async fn compact_node_truncates_when_overflowing() {
        let node = CompactNode {
            config: CompactionConfig {
                auto: true,
                max_context_tokens: 10,
                reserve_tokens: 0,
                compact_keep_recent: 1,
                ..Default::default()
            },
        };
        let state = ReActState {
            messages: vec![
                Message::system("sys"),
                Message::user("a".repeat(1000)),
                Message::assistant("recent"),
            ],
            ..Default::default()
        };
        let (out, _) = node.run(state).await.unwrap();
        assert!(matches!(&out.messages[0], Message::System(s) if s == "sys"));
        assert!(out.messages.iter().any(|m| m.content().contains("dropped")));
        assert!(matches!(out.messages.last(), Some(Message::Assistant(s)) if s == "recent"));
    }
}
