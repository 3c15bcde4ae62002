//! Recipe assistant chat: message model, streaming client and a quota-limited session.

mod open_ai;
mod stream;

pub use open_ai::OpenAiChatService;
pub use stream::{decode_event_data, StreamChoice, StreamChunk, StreamDelta, DONE_SENTINEL};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChatError;
use crate::settings::{DailyQuota, SettingsStore};

pub const SYSTEM_PROMPT_ID: &str = "prompt";

pub const SYSTEM_PROMPT: &str = "You are a chef assistant who helps with anything that happens in the kitchen. \
Only answer questions about cooking or recipes. \
Only when the user says 'RecipeRealm It', convert or create a recipe in this format:\n\
Title:\nCuisine:\nPrep Time:\nCook Time:\nIngredients:\nSteps:\nNotes:\n\
For Ingredients, Steps and Notes put no dashes or numbers before the text. \
For Prep Time and Cook Time abbreviate hours to 'hrs' and minutes to 'm'.";

/// Shown in place of a reply when the stream fails
pub const FAILURE_NOTE: &str = "Sorry, something went wrong while answering. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// The reply broke off; the message is shown but never sent back as history
    #[serde(default)]
    pub failed: bool,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: Utc::now(),
            failed: false,
        }
    }
}

/// Backend that streams an assistant reply for a conversation
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn stream_reply(
        &self,
        messages: &[ChatMessage],
        on_chunk: &mut (dyn FnMut(StreamChunk) + Send),
    ) -> Result<(), ChatError>;
}

/// A conversation seeded with the assistant prompt
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    quota: DailyQuota,
}

impl ChatSession {
    pub fn new(quota: DailyQuota) -> Self {
        Self {
            messages: vec![ChatMessage {
                id: SYSTEM_PROMPT_ID.to_string(),
                role: ChatRole::System,
                content: SYSTEM_PROMPT.to_string(),
                created_at: Utc::now(),
                failed: false,
            }],
            quota,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Latest assistant message, if one has arrived
    pub fn last_reply(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
    }

    /// Send `text` and stream the reply into the conversation
    ///
    /// Fails only when the daily quota is used up or cannot be recorded. A failing stream
    /// is logged and leaves [`FAILURE_NOTE`] in the assistant slot.
    pub async fn send(
        &mut self,
        text: &str,
        service: &dyn ChatService,
        settings: &mut SettingsStore,
        today: NaiveDate,
    ) -> Result<(), ChatError> {
        self.quota.consume(settings, today)?;
        self.messages.push(ChatMessage::new(ChatRole::User, text));

        let history: Vec<ChatMessage> = self
            .messages
            .iter()
            .filter(|m| !m.failed)
            .cloned()
            .collect();
        let first_reply = self.messages.len();
        let messages = &mut self.messages;
        let result = service
            .stream_reply(&history, &mut |chunk: StreamChunk| {
                upsert_chunk(messages, chunk)
            })
            .await;

        match result {
            Ok(()) => info!("Chat reply received"),
            Err(e) => {
                error!("Chat stream failed: {}", e);
                match self.messages.get_mut(first_reply) {
                    Some(reply) => {
                        reply.content.push_str("\n\n");
                        reply.content.push_str(FAILURE_NOTE);
                        reply.failed = true;
                    }
                    None => {
                        let mut note = ChatMessage::new(ChatRole::Assistant, FAILURE_NOTE);
                        note.failed = true;
                        self.messages.push(note);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Append the chunk's text to the assistant message with the same id, or start one
fn upsert_chunk(messages: &mut Vec<ChatMessage>, chunk: StreamChunk) {
    let Some(content) = chunk.content() else {
        return;
    };
    match messages.iter_mut().rev().find(|m| m.id == chunk.id) {
        Some(existing) => existing.content.push_str(content),
        None => messages.push(ChatMessage {
            id: chunk.id.clone(),
            role: ChatRole::Assistant,
            content: content.to_string(),
            created_at: Utc::now(),
            failed: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedService {
        events: &'static [&'static str],
        fail: bool,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedService {
        fn new(events: &'static [&'static str], fail: bool) -> Self {
            Self {
                events,
                fail,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatService for ScriptedService {
        async fn stream_reply(
            &self,
            messages: &[ChatMessage],
            on_chunk: &mut (dyn FnMut(StreamChunk) + Send),
        ) -> Result<(), ChatError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            for data in self.events {
                if let Some(chunk) = decode_event_data(data) {
                    on_chunk(chunk);
                }
            }
            if self.fail {
                Err(ChatError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[tokio::test]
    async fn test_reply_is_concatenated_by_id() {
        let service = ScriptedService::new(
            &[
                r#"{"id":"a","choices":[{"delta":{"content":"Use "}}]}"#,
                r#"{"id":"a","choices":[{"delta":{"content":"lime."}}]}"#,
                "[DONE]",
            ],
            false,
        );
        let mut settings = SettingsStore::in_memory();
        let mut session = ChatSession::new(DailyQuota::new(12));

        session
            .send("Garnish?", &service, &mut settings, today())
            .await
            .unwrap();

        let roles: Vec<ChatRole> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::System, ChatRole::User, ChatRole::Assistant]
        );
        assert_eq!(session.last_reply().unwrap().content, "Use lime.");
        assert_eq!(session.last_reply().unwrap().id, "a");
    }

    #[tokio::test]
    async fn test_stream_failure_marks_reply() {
        let service = ScriptedService::new(
            &[r#"{"id":"b","choices":[{"delta":{"content":"Half"}}]}"#],
            true,
        );
        let mut settings = SettingsStore::in_memory();
        let mut session = ChatSession::new(DailyQuota::new(12));

        session
            .send("Hi", &service, &mut settings, today())
            .await
            .unwrap();
        let reply = session.last_reply().unwrap();
        assert!(reply.content.starts_with("Half"));
        assert!(reply.content.ends_with(FAILURE_NOTE));
        assert!(reply.failed);
    }

    #[tokio::test]
    async fn test_failed_reply_not_sent_as_history() {
        let mut settings = SettingsStore::in_memory();
        let mut session = ChatSession::new(DailyQuota::new(12));

        let broken = ScriptedService::new(
            &[r#"{"id":"b","choices":[{"delta":{"content":"Half"}}]}"#],
            true,
        );
        session
            .send("Hi", &broken, &mut settings, today())
            .await
            .unwrap();

        let working = ScriptedService::new(
            &[r#"{"id":"c","choices":[{"delta":{"content":"Hello"}}]}"#],
            false,
        );
        session
            .send("Still there?", &working, &mut settings, today())
            .await
            .unwrap();

        let seen = working.seen.lock().unwrap();
        let history = &seen[0];
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|m| !m.content.contains(FAILURE_NOTE)));
        assert!(history.iter().all(|m| m.role != ChatRole::Assistant));
        // still shown in the conversation
        assert_eq!(session.messages().len(), 5);
        assert!(session.messages()[2].failed);
        assert_eq!(session.last_reply().unwrap().content, "Hello");
    }

    #[tokio::test]
    async fn test_quota_blocks_before_sending() {
        let service = ScriptedService::new(&[], false);
        let mut settings = SettingsStore::in_memory();
        let mut session = ChatSession::new(DailyQuota::new(1));

        session
            .send("one", &service, &mut settings, today())
            .await
            .unwrap();
        // empty stream and no error leaves no assistant message
        assert!(session.last_reply().is_none());

        let err = session
            .send("two", &service, &mut settings, today())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::QuotaExceeded));
        assert_eq!(session.messages().len(), 2);
    }
}
