//! Handler tests for the gateway routes
//!
//! Backends are simulated with wiremock; requests go through the same route table as the
//! binary.

use crate::backend::BackendClient;
use crate::config::GatewayConfig;


/// Base URL nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub const BOUNDARY: &str = "voice-gateway-test-boundary";

/// Configuration and client pointing at the given backends
pub fn gateway(inference_url: &str, llm_url: &str) -> (GatewayConfig, BackendClient) {
    let config = GatewayConfig::new(inference_url, llm_url);
    let backend = BackendClient::new().expect("Failed to build backend client");
    (config, backend)
}

/// One part of a test multipart body
pub struct FormPart<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> FormPart<'a> {
    pub fn file(file_name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name: "file",
            file_name: Some(file_name),
            data,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            data: value.as_bytes(),
        }
    }
}

/// Content type header for bodies built by [`multipart_body`]
pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// Encode `parts` as a multipart/form-data body
pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: audio/wav\r\n\r\n",
                        part.name, file_name
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
