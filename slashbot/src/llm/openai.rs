//! OpenAI-compatible chat completion client for [`LlmClient`].

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;

use super::{LlmClient, LlmResponse, LlmUsage};
use crate::error::AgentError;
use crate::message::Message;
use crate::stream::MessageChunk;

pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
}

impl ChatOpenAI {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.into());
        Self::with_config(config, model)
    }

    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }
}

fn to_request_message(message: &Message) -> Result<ChatCompletionRequestMessage, AgentError> {
    let to_agent_error = |e: impl std::fmt::Display| AgentError::LlmRequest(e.to_string());
    Ok(match message {
        Message::System(text) => ChatCompletionRequestSystemMessageArgs::default()
            .content(text.as_str())
            .build()
            .map_err(to_agent_error)?
            .into(),
        Message::User(text) => ChatCompletionRequestUserMessageArgs::default()
            .content(text.as_str())
            .build()
            .map_err(to_agent_error)?
            .into(),
        Message::Assistant(text) => ChatCompletionRequestAssistantMessageArgs::default()
            .content(text.as_str())
            .build()
            .map_err(to_agent_error)?
            .into(),
    })
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .build()
            .map_err(|e| AgentError::LlmRequest(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::LlmRequest(e.to_string()))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::LlmRequest("no choices in chat completion".to_string()))?;

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            tool_calls: Vec::new(),
            usage,
        })
    }

    async fn invoke_stream(
        &self,
        messages: &[Message],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let request_messages = messages
            .iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .build()
            .map_err(|e| AgentError::LlmRequest(e.to_string()))?;

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AgentError::LlmRequest(e.to_string()))?;

        let mut content = String::new();
        while let Some(next) = stream.next().await {
            let response = next.map_err(|e| AgentError::LlmRequest(e.to_string()))?;
            for choice in response.choices {
                if let Some(delta) = choice.delta.content {
                    content.push_str(&delta);
                    if let Some(tx) = &chunk_tx {
                        let _ = tx
                            .send(MessageChunk {
                                content: delta.clone(),
                            })
                            .await;
                    }
                }
            }
        }

        Ok(LlmResponse {
            content,
            tool_calls: Vec::new(),
            usage: None,
        })
    }
}
