//! Chat message: the unit the LLM client and the turn loop pass around.

use serde::{Deserialize, Serialize};

/// One message in a conversation transcript. Plain-text content only; action
/// tags embedded in `Assistant` text are parsed out by
/// [`crate::actions::parser`], not represented as a separate variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant(content.into())
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(s) | Message::User(s) | Message::Assistant(s) => s,
        }
    }
}
