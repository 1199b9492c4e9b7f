// Backend client for Voice Gateway
//
// This module owns the outbound HTTP client and the two backend calls. Requests are
// forwarded once, without retry or timeout, and the backend answer is returned untouched.

use log::{error, info};
use reqwest::multipart::{Form, Part};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::{BackendResponse, ChatCompletionRequest, TranscriptionUpload};

/// Content type of the forwarded audio part
const AUDIO_PART_MIME: &str = "application/octet-stream";

/// Shared client for the inference and LLM backends
///
/// `reqwest::Client` is reference counted, so clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Forward an audio upload to `{inference_url}/v1/audio/transcriptions`
    pub async fn transcribe(
        &self,
        config: &GatewayConfig,
        upload: TranscriptionUpload,
    ) -> Result<BackendResponse, GatewayError> {
        let request_id = Uuid::new_v4();
        let url = config.transcription_endpoint();
        info!(
            "[{}] Forwarding {} ({} bytes, language: {}) to {}",
            request_id,
            upload.file_name,
            upload.data.len(),
            upload.language.as_deref().unwrap_or("auto"),
            url
        );

        let form = build_transcription_form(&config.model_name, upload)?;
        let request = self.client.post(&url).multipart(form);

        self.send(request_id, "inference API", request).await
    }

    /// Forward a chat-completion request to `{llm_url}/v1/chat/completions`
    pub async fn chat(
        &self,
        config: &GatewayConfig,
        chat: &ChatCompletionRequest,
    ) -> Result<BackendResponse, GatewayError> {
        let request_id = Uuid::new_v4();
        let url = config.chat_endpoint();

        let body = serde_json::to_vec(chat).map_err(|e| {
            GatewayError::internal(format!("Failed to create LLM request: {}", e))
        })?;
        info!(
            "[{}] Forwarding summarization ({} bytes, model {}) to {}",
            request_id,
            body.len(),
            chat.model,
            url
        );

        let request = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);

        self.send(request_id, "LLM API", request).await
    }

    async fn send(
        &self,
        request_id: Uuid,
        backend: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<BackendResponse, GatewayError> {
        let response = request.send().await.map_err(|e| {
            error!("[{}] Failed to call {}: {}", request_id, backend, e);
            // Anything not produced by the transport is a local construction failure
            if e.is_builder() {
                GatewayError::internal(format!("Failed to create request: {}", e))
            } else {
                GatewayError::BackendUnreachable { backend, source: e }
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            error!("[{}] Failed to read {} response: {}", request_id, backend, e);
            GatewayError::internal(format!("Failed to read response: {}", e))
        })?;

        info!(
            "[{}] {} answered {} ({} bytes)",
            request_id,
            backend,
            status,
            body.len()
        );

        Ok(BackendResponse { status, body })
    }
}

/// Build the multipart body sent to the inference backend
///
/// Parts are `file`, `model`, then `language` when the caller provided one.
pub fn build_transcription_form(
    model_name: &str,
    upload: TranscriptionUpload,
) -> Result<Form, GatewayError> {
    let file_part = Part::bytes(upload.data)
        .file_name(upload.file_name)
        .mime_str(AUDIO_PART_MIME)
        .map_err(|e| GatewayError::internal(format!("Failed to create form: {}", e)))?;

    let mut form = Form::new()
        .part("file", file_part)
        .text("model", model_name.to_string());

    if let Some(language) = upload.language {
        form = form.text("language", language);
    }

    Ok(form)
}
