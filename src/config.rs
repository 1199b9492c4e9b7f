// Voice Gateway configuration
//
// This module contains the configuration structure and default values for the gateway.
// The configuration is built once at startup (see config_validator) and shared read-only
// with every worker.

use std::path::PathBuf;

/// Default values for configuration
pub mod defaults {
    // Model name sent to the inference backend
    pub const MODEL_NAME: &str = "whisper-1";

    // Model name sent to the LLM backend
    pub const LLM_MODEL: &str = "gpt-3.5-turbo";

    // Listen address
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: &str = "8080";

    // Root directory of the front end assets
    pub const STATIC_DIR: &str = "static";

    // Upload ceiling for /transcribe (100 MiB)
    pub const MAX_UPLOAD_SIZE: usize = 100 << 20;

    // 0 lets actix pick the worker count
    pub const HTTP_WORKER_NUMBER: usize = 0;
}

/// Gateway configuration, immutable after startup
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Base URL of the speech-to-text backend, without trailing slash
    pub inference_url: String,
    /// Model requested from the speech-to-text backend
    pub model_name: String,
    /// Base URL of the chat-completion backend, without trailing slash
    pub llm_url: String,
    /// Model requested from the chat-completion backend
    pub llm_model: String,
    pub host: String,
    pub port: u16,
    /// Directory holding index.html and the static assets
    pub static_dir: PathBuf,
    /// Maximum number of multipart bytes read for one transcription request
    pub max_upload_size: usize,
    pub workers: usize,
}

impl GatewayConfig {
    /// Build a configuration for the two backends, every other value at its default.
    ///
    /// Base URLs are normalized the same way as when loaded from the environment.
    pub fn new(inference_url: &str, llm_url: &str) -> Self {
        Self {
            inference_url: normalize_base_url(inference_url),
            model_name: String::from(defaults::MODEL_NAME),
            llm_url: normalize_base_url(llm_url),
            llm_model: String::from(defaults::LLM_MODEL),
            host: String::from(defaults::HOST),
            port: 8080,
            static_dir: PathBuf::from(defaults::STATIC_DIR),
            max_upload_size: defaults::MAX_UPLOAD_SIZE,
            workers: defaults::HTTP_WORKER_NUMBER,
        }
    }

    /// Full URL of the backend transcription endpoint
    pub fn transcription_endpoint(&self) -> String {
        format!("{}/v1/audio/transcriptions", self.inference_url)
    }

    /// Full URL of the backend chat-completion endpoint
    pub fn chat_endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.llm_url)
    }

    /// Address handed to `HttpServer::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Strip a single trailing `/` from a backend base URL
pub fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_stripped() {
        assert_eq!(normalize_base_url("http://h1/"), "http://h1");
        assert_eq!(normalize_base_url("http://h2"), "http://h2");
        assert_eq!(normalize_base_url("http://h1/api/"), "http://h1/api");
    }

    #[test]
    fn test_endpoints_use_normalized_urls() {
        let config = GatewayConfig::new("http://h1/", "http://h2/");
        assert_eq!(
            config.transcription_endpoint(),
            "http://h1/v1/audio/transcriptions"
        );
        assert_eq!(config.chat_endpoint(), "http://h2/v1/chat/completions");
    }

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::new("http://h1", "http://h2");
        assert_eq!(config.model_name, "whisper-1");
        assert_eq!(config.llm_model, "gpt-3.5-turbo");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.max_upload_size, 104_857_600);
    }
}
