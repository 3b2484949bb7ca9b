//! Chat orchestration use case
//!
//! Appends the user's message to the day's entry, streams the mentor's reply
//! from the chat backend, and persists the finished transcript.

use crate::domain::{DailyEntry, Message, SessionKind};
use crate::error::{DiaryError, Result};
use crate::infrastructure::{ChatBackend, DiaryRepository, JsonFileStore};
use chrono::{NaiveDate, Utc};

/// Shown when the backend call fails
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble connecting to my thoughts right now. Please check your API Key.";

/// Result of one exchange
#[derive(Debug)]
pub enum ChatOutcome {
    /// The reply was received and saved
    Reply(Message),
    /// The backend failed; `message` is shown but not saved
    Fallback { message: Message, cause: DiaryError },
}

/// Service for holding a reflection dialogue with the mentor
pub struct ChatService<B: ChatBackend> {
    repository: JsonFileStore,
    backend: B,
}

impl<B: ChatBackend> ChatService<B> {
    pub fn new(repository: JsonFileStore, backend: B) -> Self {
        ChatService {
            repository,
            backend,
        }
    }

    /// Send `text` as the user's next message for `date`.
    ///
    /// `on_update` receives the accumulated reply text after every streamed
    /// chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the message is blank, no API key is configured, or
    /// the store cannot be read or written. Backend failures are reported as
    /// [`ChatOutcome::Fallback`] instead.
    pub async fn send<F>(
        &self,
        date: NaiveDate,
        text: &str,
        mut on_update: F,
    ) -> Result<ChatOutcome>
    where
        F: FnMut(&str) + Send,
    {
        if text.trim().is_empty() {
            return Err(DiaryError::EmptyMessage);
        }

        let settings = self.repository.load_settings()?;
        if !settings.has_api_key() {
            return Err(DiaryError::MissingApiKey);
        }

        let mut entry = self
            .repository
            .get_entry(date)?
            .unwrap_or_else(|| DailyEntry::new(date));
        let history = entry.messages.clone();

        entry.messages.push(Message::user(text));
        entry.touch();
        self.repository.save_entry(&entry)?;

        tracing::debug!(%date, history = history.len(), "streaming reply");

        let mut reply = Message::model("");
        let result = {
            let mut on_chunk = |delta: &str| {
                reply.content.push_str(delta);
                on_update(&reply.content);
            };
            self.backend
                .stream_reply(&history, &settings.system_prompt, text, &mut on_chunk)
                .await
        };

        match result {
            Ok(_) => {
                reply.timestamp = Utc::now().timestamp_millis();
                entry.messages.push(reply.clone());
                entry.touch();
                self.repository.save_entry(&entry)?;
                Ok(ChatOutcome::Reply(reply))
            }
            Err(cause) => {
                tracing::warn!(error = %cause, "chat request failed");
                Ok(ChatOutcome::Fallback {
                    message: Message::model(FALLBACK_REPLY),
                    cause,
                })
            }
        }
    }

    /// Open a guided morning or evening session
    pub async fn start_session<F>(
        &self,
        date: NaiveDate,
        kind: SessionKind,
        on_update: F,
    ) -> Result<ChatOutcome>
    where
        F: FnMut(&str) + Send,
    {
        tracing::info!(%date, %kind, "starting session");
        self.send(date, kind.opener(), on_update).await
    }
}
