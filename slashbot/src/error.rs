//! Top-level runtime error, returned by graph nodes, the LLM client, and
//! anything else that doesn't have a narrower error type of its own.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    #[error("llm request failed: {0}")]
    LlmRequest(String),

    #[error("tool execution failed: {0}")]
    ToolExecution(String),

    #[error("action denied: {0}")]
    Denied(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_failed_display_includes_message() {
        let err = AgentError::ExecutionFailed("boom".into());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AgentError = io_err.into();
        assert!(matches!(err, AgentError::Io(_)));
    }
}
