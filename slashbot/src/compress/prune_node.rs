//! Prune node: drop older context-feed content once it exceeds the token
//! budget this system reserves for tool-result history. Deterministic and
//! non-summarizing: dropped content is replaced by a count, never rewritten.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::Message;
use crate::state::ReActState;

use super::config::CompactionConfig;

pub struct PruneNode {
    pub config: CompactionConfig,
}

fn estimate_tokens(s: &str) -> u32 {
    (s.len() / 4).max(1) as u32
}

/// Keeps the system message and the most recent messages whose combined size
/// fits within `prune_keep_tokens`, dropping older ones entirely and
/// replacing the gap with a single marker line.
fn prune_messages(messages: Vec<Message>, keep_tokens: u32, minimum: Option<u32>) -> Vec<Message> {
    if messages.is_empty() {
        return messages;
    }

    let total_tokens: u32 = messages.iter().map(|m| estimate_tokens(m.content())).sum();
    if total_tokens <= keep_tokens {
        return messages;
    }
    if let Some(min) = minimum {
        if total_tokens - keep_tokens < min {
            return messages;
        }
    }

    let system = match messages.first() {
        Some(Message::System(_)) => Some(messages[0].clone()),
        _ => None,
    };
    let rest_start = if system.is_some() { 1 } else { 0 };
    let rest = &messages[rest_start..];

    let mut kept_rev = Vec::new();
    let mut budget = keep_tokens;
    let mut dropped = 0usize;
    for msg in rest.iter().rev() {
        let cost = estimate_tokens(msg.content());
        if cost <= budget {
            budget -= cost;
            kept_rev.push(msg.clone());
        } else {
            dropped += 1;
        }
    }
    kept_rev.reverse();

    let mut out = Vec::with_capacity(kept_rev.len() + 2);
    if let Some(sys) = system {
        out.push(sys);
    }
    if dropped > 0 {
        out.push(Message::System(format!(
            "[{} earlier message(s) pruned to stay within the context budget]",
            dropped
        )));
    }
    out.extend(kept_rev);
    out
}

#[async_trait]
impl Node<ReActState> for PruneNode {
    fn id(&self) -> &str {
        "prune"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        if !self.config.prune {
            return Ok((state, Next::Continue));
        }
        let messages = prune_messages(
            state.messages,
            self.config.prune_keep_tokens,
            self.config.prune_minimum,
        );
        Ok((ReActState { messages, ..state }, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(messages: Vec<Message>) -> ReActState {
        ReActState {
            messages,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn prune_disabled_passes_through() {
        let node = PruneNode {
            config: CompactionConfig {
                prune: false,
                ..Default::default()
            },
        };
        let state = state_with(vec![Message::user("a".repeat(200_000))]);
        let (out, _) = node.run(state).await.unwrap();
        assert_eq!(out.messages.len(), 1);
    }

    #[tokio::test]
    async fn prune_keeps_system_and_drops_old_messages_over_budget() {
        let node = PruneNode {
            config: CompactionConfig {
                prune: true,
                prune_keep_tokens: 10,
                prune_minimum: Some(0),
                ..Default::default()
            },
        };
        let messages = vec![
            Message::system("sys"),
            Message::user("a".repeat(1000)),
            Message::assistant("recent"),
        ];
        let state = state_with(messages);
        let (out, _) = node.run(state).await.unwrap();
        assert!(matches!(&out.messages[0], Message::System(s) if s == "sys"));
        assert!(out.messages.iter().any(|m| m.content().contains("pruned")));
        assert!(out
            .messages
            .iter()
            .any(|m| matches!(m, Message::Assistant(s) if s == "recent")));
    }

    #[tokio::test]
    async fn prune_below_minimum_gap_is_noop() {
        let node = PruneNode {
            config: CompactionConfig {
                prune: true,
                prune_keep_tokens: 10,
                prune_minimum: Some(1_000_000),
                ..Default::default()
            },
        };
        let messages = vec![Message::user("a".repeat(1000))];
        let state = state_with(messages);
        let (out, _) = node.run(state).await.unwrap();
        assert_eq!(out.messages.len(), 1);
    }
}
