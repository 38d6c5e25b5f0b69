//! Overflow check: has the running transcript grown past the usable context window?

use crate::message::Message;

/// Inputs needed to decide whether the context window has overflowed.
pub struct ContextWindowCheck<'a> {
    pub messages: &'a [Message],
    /// Most recent usage report, when the LLM client returned one.
    pub usage: Option<(u32, u32)>,
    pub message_count_after_last_think: Option<usize>,
    pub max_context_tokens: u32,
    pub reserve_tokens: u32,
}

/// Rough token estimate: ~4 characters per token, the same heuristic most
/// tokenizer-free context budgeting uses when an exact count isn't available.
fn estimate_tokens(messages: &[Message]) -> u32 {
    let chars: usize = messages.iter().map(|m| m.content().len()).sum();
    (chars / 4).max(1) as u32
}

/// Returns true when the current context plus the reserved generation budget
/// would exceed `max_context_tokens`. Prefers the LLM's own reported usage
/// when available (accurate), falling back to the character-count estimate
/// for messages produced since the last think step.
pub fn is_overflow(check: &ContextWindowCheck) -> bool {
    let current_tokens = match check.usage {
        Some((prompt, completion)) => prompt + completion,
        None => estimate_tokens(check.messages),
    };
    current_tokens.saturating_add(check.reserve_tokens) > check.max_context_tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overflow_when_under_budget() {
        let messages = vec![Message::user("hi")];
        let check = ContextWindowCheck {
            messages: &messages,
            usage: None,
            message_count_after_last_think: None,
            max_context_tokens: 1000,
            reserve_tokens: 100,
        };
        assert!(!is_overflow(&check));
    }

    #[test]
    fn overflow_when_estimate_exceeds_budget() {
        let messages = vec![Message::user("a".repeat(10_000))];
        let check = ContextWindowCheck {
            messages: &messages,
            usage: None,
            message_count_after_last_think: None,
            max_context_tokens: 1000,
            reserve_tokens: 100,
        };
        assert!(is_overflow(&check));
    }

    #[test]
    fn overflow_prefers_reported_usage_over_estimate() {
        let messages = vec![Message::user("short")];
        let check = ContextWindowCheck {
            messages: &messages,
            usage: Some((5000, 0)),
            message_count_after_last_think: None,
            max_context_tokens: 1000,
            reserve_tokens: 100,
        };
        assert!(is_overflow(&check));
    }
}
