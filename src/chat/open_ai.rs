use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use log::{debug, error};
use reqwest::Client;
use serde_json::json;

use super::stream::{decode_event_data, StreamChunk, DONE_SENTINEL};
use super::{ChatMessage, ChatService};
use crate::config::ChatConfig;
use crate::error::ChatError;

/// Streaming client for an OpenAI compatible `/chat/completions` endpoint
pub struct OpenAiChatService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiChatService {
    /// Create a client from configuration
    pub fn new(config: &ChatConfig) -> Result<Self, ChatError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or(ChatError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl ChatService for OpenAiChatService {
    async fn stream_reply(
        &self,
        messages: &[ChatMessage],
        on_chunk: &mut (dyn FnMut(StreamChunk) + Send),
    ) -> Result<(), ChatError> {
        let body = json!({
            "model": self.model,
            "messages": messages
                .iter()
                .map(|m| json!({"role": m.role, "content": m.content}))
                .collect::<Vec<_>>(),
            "stream": true,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Chat request rejected with status {}", status);
            return Err(ChatError::Status(status.as_u16()));
        }

        let mut events = response.bytes_stream().eventsource();
        while let Some(event) = events.next().await {
            let event = event.map_err(|e| ChatError::Stream(e.to_string()))?;
            if event.data.trim() == DONE_SENTINEL {
                break;
            }
            if let Some(chunk) = decode_event_data(&event.data) {
                on_chunk(chunk);
            }
        }
        debug!("Chat stream complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;
    use mockito::Server;

    #[tokio::test]
    async fn test_stream_reply() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(concat!(
                "data: {\"id\":\"r1\",\"choices\":[{\"delta\":{\"content\":\"Sear \"}}]}\n\n",
                "data: {\"id\":\"r1\",\"choices\":[{\"delta\":{\"content\":\"the pork\"}}]}\n\n",
                "data: [DONE]\n\n",
            ))
            .create_async()
            .await;

        let service = OpenAiChatService::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4".to_string(),
        );
        let messages = vec![ChatMessage::new(ChatRole::User, "How do I start?")];
        let mut text = String::new();
        service
            .stream_reply(&messages, &mut |chunk: StreamChunk| {
                text.push_str(chunk.content().unwrap_or_default())
            })
            .await
            .unwrap();

        assert_eq!(text, "Sear the pork");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stream_reply_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": "bad key"}"#)
            .create_async()
            .await;

        let service = OpenAiChatService::with_base_url(
            "fake_api_key".to_string(),
            server.url(),
            "gpt-4".to_string(),
        );
        let result = service.stream_reply(&[], &mut |_: StreamChunk| {}).await;
        assert!(matches!(result, Err(ChatError::Status(401))));
        mock.assert_async().await;
    }

    #[test]
    fn test_missing_api_key() {
        if std::env::var("OPENAI_API_KEY").is_ok() {
            return;
        }
        let result = OpenAiChatService::new(&ChatConfig::default());
        assert!(matches!(result, Err(ChatError::MissingApiKey)));
    }
}
