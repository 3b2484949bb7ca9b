//! Streaming client for the Gemini generative-language API

use crate::domain::Message;
use crate::error::{DiaryError, Result};
use crate::infrastructure::Config;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A hosted chat model that streams its reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `new_message` after `history`, calling `on_chunk` with every
    /// non-empty text delta as it arrives. Returns the full reply.
    async fn stream_reply(
        &self,
        history: &[Message],
        system_instruction: &str,
        new_message: &str,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'a str>, text: &'a str) -> Self {
        Content {
            role,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

impl StreamChunk {
    /// Text of the first candidate, all parts joined
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Incremental server-sent-events decoder.
///
/// Bytes may be split anywhere, including inside a UTF-8 sequence, so lines
/// are only decoded once complete.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed raw bytes; returns the data payloads of every event completed by them
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            self.handle_line(line, &mut events);
        }

        events
    }

    /// Flush whatever is left once the stream ends
    pub fn finish(mut self) -> Vec<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest).into_owned();
            self.handle_line(line.trim_end_matches('\r'), &mut events);
        }
        self.dispatch(&mut events);
        events
    }

    fn handle_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            self.dispatch(events);
        } else if let Some(value) = line.strip_prefix("data:") {
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
        // comments (":") and other fields (event, id, retry) carry nothing we use
    }

    fn dispatch(&mut self, events: &mut Vec<String>) {
        if !self.data.is_empty() {
            events.push(self.data.join("\n"));
            self.data.clear();
        }
    }
}

/// HTTP client for `streamGenerateContent`
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Creates a new client from the diary configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(api_key: String, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("stoic-diary/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GeminiClient {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.api_base, self.model
        )
    }

    fn handle_event(
        payload: &str,
        full: &mut String,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<()> {
        if payload.trim() == "[DONE]" {
            return Ok(());
        }

        let chunk: StreamChunk = match serde_json::from_str(payload) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable stream event");
                return Ok(());
            }
        };

        if let Some(err) = chunk.error {
            return Err(DiaryError::Api {
                status: err.code,
                body: err.message,
            });
        }

        let text = chunk.text();
        if !text.is_empty() {
            full.push_str(&text);
            on_chunk(&text);
        }
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn stream_reply(
        &self,
        history: &[Message],
        system_instruction: &str,
        new_message: &str,
        on_chunk: &mut (dyn for<'c> FnMut(&'c str) + Send),
    ) -> Result<String> {
        let mut contents: Vec<Content<'_>> = history
            .iter()
            .map(|msg| Content::text(Some(msg.role.as_str()), &msg.content))
            .collect();
        contents.push(Content::text(Some("user"), new_message));

        let request = GenerateContentRequest {
            system_instruction: (!system_instruction.trim().is_empty())
                .then(|| Content::text(None, system_instruction)),
            contents,
        };

        tracing::debug!(model = %self.model, history = history.len(), "sending chat request");

        let response = self
            .client
            .post(self.stream_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response".to_string());
            return Err(DiaryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut full = String::new();

        while let Some(item) = stream.next().await {
            let bytes = item?;
            for payload in decoder.feed(&bytes) {
                Self::handle_event(&payload, &mut full, on_chunk)?;
            }
        }
        for payload in decoder.finish() {
            Self::handle_event(&payload, &mut full, on_chunk)?;
        }

        tracing::debug!(chars = full.len(), "chat reply complete");
        Ok(full)
    }
}
