// Error handling for Voice Gateway
//
// This module defines the errors a gateway handler can return and how each one is
// rendered to the caller. Backend error statuses are not errors here: they are relayed
// as-is by the handlers.

use thiserror::Error;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::ErrorResponse;

/// Errors that can occur while handling a gateway request
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Request used a method the route does not accept
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Error when parsing the multipart form data
    #[error("Failed to parse form: {0}")]
    FormError(String),

    /// Error when no uploaded file was found in the form
    #[error("Failed to get file: no audio file provided")]
    NoAudioFile,

    /// Uploaded file does not have a .wav name
    #[error("Only WAV files are supported")]
    UnsupportedAudioFormat(String),

    /// Multipart body exceeds the configured ceiling
    #[error("File too large: {0} bytes exceeds limit of {1} bytes")]
    FileTooLarge(usize, usize),

    /// Request body is not a JSON object
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Summarization request without usable text
    #[error("Text field is required")]
    MissingText,

    /// Static path contains a parent directory component
    #[error("Invalid path")]
    InvalidPath,

    #[error("Not found")]
    NotFound,

    /// Transport failure while contacting a backend
    #[error("Failed to call {backend}: {source}")]
    BackendUnreachable {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Failure building the outbound request or reading its response
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    /// Create a new FormError
    pub fn form_error<S: Into<String>>(msg: S) -> Self {
        Self::FormError(msg.into())
    }

    /// Create a new Internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::FormError(_)
            | GatewayError::NoAudioFile
            | GatewayError::UnsupportedAudioFormat(_)
            | GatewayError::InvalidJson(_)
            | GatewayError::MissingText
            | GatewayError::InvalidPath => StatusCode::BAD_REQUEST,
            GatewayError::FileTooLarge(_, _) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::BackendUnreachable { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_bad_requests() {
        for err in [
            GatewayError::form_error("boundary missing"),
            GatewayError::NoAudioFile,
            GatewayError::UnsupportedAudioFormat("clip.mp3".into()),
            GatewayError::InvalidJson("expected value".into()),
            GatewayError::MissingText,
            GatewayError::InvalidPath,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err);
        }
    }

    #[test]
    fn test_other_statuses() {
        assert_eq!(
            GatewayError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            GatewayError::FileTooLarge(10, 5).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(GatewayError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            GatewayError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_form_error_echoes_reason() {
        let err = GatewayError::form_error("no boundary");
        assert_eq!(err.to_string(), "Failed to parse form: no boundary");
    }
}
