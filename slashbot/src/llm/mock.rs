//! Fixed-response [`LlmClient`] for tests and the no-config CLI default.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{LlmClient, LlmResponse};
use crate::error::AgentError;
use crate::message::Message;

/// Returns a fixed sequence of responses, one per call, repeating the last
/// entry once exhausted. Useful for scripting "think, act, observe, think,
/// final answer"-shaped test runs without a real model.
pub struct MockLlm {
    responses: Vec<String>,
    call_count: AtomicUsize,
}

impl MockLlm {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Always answers with the same text; no action tags, so the graph ends
    /// after one think/parse_actions pass.
    pub fn fixed_answer(text: impl Into<String>) -> Self {
        Self::new(vec![text.into()])
    }

    /// First response emits a `<get_time/>` action tag, second is a plain
    /// final answer. Matches `MockToolSource::get_time_example`, used
    /// together as `resolve_run_agent_options`'s no-config fallback.
    pub fn first_tools_then_end() -> Self {
        Self::new(vec!["<get_time/>".to_string(), "Done.".to_string()])
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, _messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let index = self.call_count.fetch_add(1, Ordering::SeqCst);
        let content = self
            .responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_default();
        Ok(LlmResponse {
            content,
            tool_calls: Vec::new(),
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn steps_through_responses_in_order() {
        let llm = MockLlm::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "a");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "b");
    }

    #[tokio::test]
    async fn repeats_last_response_once_exhausted() {
        let llm = MockLlm::new(vec!["only".to_string()]);
        let _ = llm.invoke(&[]).await.unwrap();
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "only");
    }

    #[tokio::test]
    async fn fixed_answer_always_returns_same_text() {
        let llm = MockLlm::fixed_answer("hi there");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "hi there");
        assert_eq!(llm.invoke(&[]).await.unwrap().content, "hi there");
    }
}
