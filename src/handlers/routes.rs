// API route handlers for Voice Gateway
//
// This module contains the /transcribe and /summarize gateways. Each handler validates
// the caller's request, performs exactly one backend call and relays the backend status
// and body unchanged.

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use log::warn;
use serde::Deserialize;

use crate::backend::BackendClient;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::handlers::form::extract_form_data;
use crate::models::{BackendResponse, ChatCompletionRequest, SummarizeRequest, TranscriptionUpload};

/// Query parameters accepted by /transcribe
#[derive(Deserialize, Default)]
struct TranscribeQuery {
    language: Option<String>,
}

/// Handler for transcription requests
///
/// Receives a `.wav` upload and an optional language hint, re-encodes them as a new
/// multipart body with the configured model and forwards it to the inference backend.
/// A `language` form field takes precedence over a `language` query parameter.
pub async fn transcribe(
    req: HttpRequest,
    form: Multipart,
    backend: web::Data<BackendClient>,
    config: web::Data<GatewayConfig>,
) -> Result<HttpResponse, GatewayError> {
    let form = extract_form_data(form, config.max_upload_size)
        .await
        .inspect_err(|e| warn!("Rejected transcription form: {}", e))?;

    let (file_name, data) = form.file.ok_or_else(|| {
        warn!("Transcription request without an uploaded file");
        GatewayError::NoAudioFile
    })?;

    if !TranscriptionUpload::has_wav_name(&file_name) {
        warn!("Rejected non-WAV upload: {}", file_name);
        return Err(GatewayError::UnsupportedAudioFormat(file_name));
    }

    let language = form
        .language
        .or_else(|| {
            web::Query::<TranscribeQuery>::from_query(req.query_string())
                .ok()
                .and_then(|q| q.into_inner().language)
        })
        .filter(|l| !l.is_empty());

    let upload = TranscriptionUpload {
        file_name,
        data,
        language,
    };

    let response = backend.transcribe(&config, upload).await?;
    Ok(relay(response))
}

/// Handler for summarization requests
///
/// Wraps the caller's text in a two-message chat conversation and forwards it to the
/// LLM backend. The chat-completion answer is not interpreted.
pub async fn summarize(
    body: web::Bytes,
    backend: web::Data<BackendClient>,
    config: web::Data<GatewayConfig>,
) -> Result<HttpResponse, GatewayError> {
    let request = SummarizeRequest::from_body(&body)
        .inspect_err(|e| warn!("Rejected summarization request: {}", e))?;

    let chat = ChatCompletionRequest::summarize(&config.llm_model, &request.text);
    let response = backend.chat(&config, &chat).await?;
    Ok(relay(response))
}

/// Default service for gateway resources hit with an unsupported method
pub async fn method_not_allowed() -> Result<HttpResponse, GatewayError> {
    Err(GatewayError::MethodNotAllowed)
}

/// Default service for unknown paths
pub async fn not_found() -> Result<HttpResponse, GatewayError> {
    Err(GatewayError::NotFound)
}

/// Copy a backend answer to the caller, forcing a JSON content type
fn relay(response: BackendResponse) -> HttpResponse {
    // Backends may answer with codes outside the registered range, report those as 502
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    HttpResponse::build(status)
        .content_type("application/json")
        .body(response.body)
}
