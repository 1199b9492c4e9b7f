// Voice Gateway data models
//
// This module contains the request and response types exchanged with callers and backends.

use actix_web::web::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// Instruction sent as the system message of every summarization request
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes transcribed audio. Provide a clear, concise summary of the main points.";

/// Prefix of the user message; the caller's text follows it verbatim
pub const SUMMARY_USER_PREFIX: &str = "Please summarize the following transcription:\n\n";

/// Sampling temperature of every summarization request
pub const SUMMARY_TEMPERATURE: f64 = 0.7;

/// Error response for API
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Audio upload extracted from a /transcribe form
#[derive(Debug)]
pub struct TranscriptionUpload {
    /// Filename declared by the caller, forwarded unchanged
    pub file_name: String,
    pub data: Vec<u8>,
    /// Language hint, only set when the caller sent a non-empty value
    pub language: Option<String>,
}

impl TranscriptionUpload {
    /// Check the declared filename ends in `.wav`, ignoring case
    pub fn has_wav_name(file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(".wav")
    }
}

/// Body of a /summarize request
///
/// `text` stays untyped until [`SummarizeRequest::from_body`] checks it, so a missing,
/// non-string and empty value all map to the same error.
#[derive(Deserialize, Debug)]
struct RawSummarizeRequest {
    #[serde(default)]
    text: Option<Value>,
}

#[derive(Debug, PartialEq)]
pub struct SummarizeRequest {
    pub text: String,
}

impl SummarizeRequest {
    /// Decode a /summarize body
    ///
    /// The body must be a JSON object; fields other than `text` are ignored.
    pub fn from_body(body: &[u8]) -> Result<Self, GatewayError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| GatewayError::InvalidJson(e.to_string()))?;
        if !value.is_object() {
            return Err(GatewayError::InvalidJson(
                "expected a JSON object".to_string(),
            ));
        }

        let raw: RawSummarizeRequest =
            serde_json::from_value(value).map_err(|e| GatewayError::InvalidJson(e.to_string()))?;

        match raw.text {
            Some(Value::String(text)) if !text.is_empty() => Ok(Self { text }),
            _ => Err(GatewayError::MissingText),
        }
    }
}

/// One message of a chat conversation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Request sent to the chat-completion backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

impl ChatCompletionRequest {
    /// Build the summarization conversation for `text`
    pub fn summarize(model: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SUMMARY_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!("{}{}", SUMMARY_USER_PREFIX, text),
                },
            ],
            temperature: SUMMARY_TEMPERATURE,
        }
    }
}

/// Status and raw body returned by a backend
#[derive(Debug)]
pub struct BackendResponse {
    pub status: u16,
    pub body: Bytes,
}
