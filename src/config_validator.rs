// Configuration validation module for Voice Gateway
//
// This module validates every configuration parameter read from the environment
// and turns them into a GatewayConfig. All problems are collected before startup
// is aborted, so a misconfigured deployment reports everything at once.
//
// The validation is schema-driven: CONFIG_PARAMS lists each parameter with its type,
// default value and validation level.

use std::env;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{error, info, warn};

use crate::config::{defaults, normalize_base_url, GatewayConfig};

/// Configuration parameter types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigType {
    String,
    Url,
    UnsignedInteger,
    IpAddress,
    Port,
    DirectoryPath,
}

/// Validation severity levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationLevel {
    Critical, // Must be valid for the gateway to start
    Standard, // Invalid values are errors, missing ones fall back to defaults
    Warning,  // Only reported
}

/// Configuration parameter definition
#[derive(Debug, Clone)]
pub struct ConfigParam {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: ConfigType,
    pub default_value: Option<&'static str>,
    pub required: bool,
    pub validation_level: ValidationLevel,
    pub min_value: Option<usize>,
    pub max_value: Option<usize>,
}

/// Parameter registry
pub const CONFIG_PARAMS: &[ConfigParam] = &[
    // Backends
    ConfigParam {
        name: "INFERENCE_URL",
        description: "Base URL of the speech-to-text inference server",
        param_type: ConfigType::Url,
        default_value: None,
        required: true,
        validation_level: ValidationLevel::Critical,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "MODEL_NAME",
        description: "Model name sent with every transcription request",
        param_type: ConfigType::String,
        default_value: Some(defaults::MODEL_NAME),
        required: false,
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "LLM_URL",
        description: "Base URL of the chat-completion server",
        param_type: ConfigType::Url,
        default_value: None,
        required: true,
        validation_level: ValidationLevel::Critical,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "LLM_MODEL",
        description: "Model name sent with every summarization request",
        param_type: ConfigType::String,
        default_value: Some(defaults::LLM_MODEL),
        required: false,
        validation_level: ValidationLevel::Standard,
        min_value: None,
        max_value: None,
    },
    // Server
    ConfigParam {
        name: "HOST",
        description: "IP address the gateway listens on",
        param_type: ConfigType::IpAddress,
        default_value: Some(defaults::HOST),
        required: false,
        validation_level: ValidationLevel::Critical,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "PORT",
        description: "Port the gateway listens on",
        param_type: ConfigType::Port,
        default_value: Some(defaults::PORT),
        required: false,
        validation_level: ValidationLevel::Critical,
        min_value: None,
        max_value: None,
    },
    ConfigParam {
        name: "HTTP_WORKER_NUMBER",
        description: "Number of HTTP workers (0 = use CPU cores)",
        param_type: ConfigType::UnsignedInteger,
        default_value: Some("0"),
        required: false,
        validation_level: ValidationLevel::Standard,
        min_value: Some(0),
        max_value: Some(64),
    },
    ConfigParam {
        name: "MAX_UPLOAD_SIZE",
        description: "Maximum multipart body size accepted by /transcribe, in bytes",
        param_type: ConfigType::UnsignedInteger,
        default_value: Some("104857600"),
        required: false,
        validation_level: ValidationLevel::Standard,
        min_value: Some(1),
        max_value: None,
    },
    // Front end
    ConfigParam {
        name: "STATIC_DIR",
        description: "Directory containing index.html and the static assets",
        param_type: ConfigType::DirectoryPath,
        default_value: Some(defaults::STATIC_DIR),
        required: false,
        validation_level: ValidationLevel::Warning,
        min_value: None,
        max_value: None,
    },
];

/// Configuration validation errors with detailed context
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub value: String,
    pub error_type: ConfigErrorType,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigErrorType {
    InvalidFormat,
    InvalidRange,
    DirectoryNotFound,
    Required,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration error in '{}' ({:?}): {} (value: '{}')",
            self.field, self.error_type, self.message, self.value
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " - Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result type for configuration validation
pub type ValidationResult<T> = Result<T, ConfigValidationError>;

/// Configuration validation results
#[derive(Debug, Default)]
pub struct ValidationResults {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ConfigValidationError) {
        self.warnings.push(warning);
    }

    fn add(&mut self, level: ValidationLevel, error: ConfigValidationError) {
        match level {
            ValidationLevel::Critical | ValidationLevel::Standard => self.add_error(error),
            ValidationLevel::Warning => self.add_warning(error),
        }
    }

    pub fn print_summary(&self) {
        if !self.errors.is_empty() {
            error!(
                "Configuration validation found {} error(s):",
                self.errors.len()
            );
            for (i, err) in self.errors.iter().enumerate() {
                error!("  {}. {}", i + 1, err);
            }
        }

        if !self.warnings.is_empty() {
            warn!(
                "Configuration validation found {} warning(s):",
                self.warnings.len()
            );
            for (i, warn) in self.warnings.iter().enumerate() {
                warn!("  {}. {}", i + 1, warn);
            }
        }

        if self.is_valid() && self.warnings.is_empty() {
            info!("Configuration validation passed successfully");
        } else if self.is_valid() {
            info!(
                "Configuration validation passed with {} warning(s)",
                self.warnings.len()
            );
        }
    }
}

/// Read an environment variable, treating empty values as unset
pub fn get_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Individual value validators
pub mod validators {
    use super::*;

    pub fn validate_url(field: &str, value: &str) -> ValidationResult<String> {
        let parsed = reqwest::Url::parse(value).map_err(|e| ConfigValidationError {
            field: field.to_string(),
            value: value.to_string(),
            error_type: ConfigErrorType::InvalidFormat,
            message: format!("Invalid URL: {}", e),
            suggestion: Some("Use an absolute URL such as http://localhost:8000".to_string()),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(normalize_base_url(value)),
            scheme => Err(ConfigValidationError {
                field: field.to_string(),
                value: value.to_string(),
                error_type: ConfigErrorType::InvalidFormat,
                message: format!("Unsupported URL scheme '{}'", scheme),
                suggestion: Some("Use http:// or https://".to_string()),
            }),
        }
    }

    pub fn validate_usize(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> ValidationResult<usize> {
        let parsed = value.parse::<usize>().map_err(|_| ConfigValidationError {
            field: field.to_string(),
            value: value.to_string(),
            error_type: ConfigErrorType::InvalidFormat,
            message: "Value must be a non-negative integer".to_string(),
            suggestion: None,
        })?;

        let below = min.is_some_and(|m| parsed < m);
        let above = max.is_some_and(|m| parsed > m);
        if below || above {
            return Err(ConfigValidationError {
                field: field.to_string(),
                value: value.to_string(),
                error_type: ConfigErrorType::InvalidRange,
                message: format!(
                    "Value must be between {} and {}",
                    min.map_or("0".to_string(), |m| m.to_string()),
                    max.map_or("unbounded".to_string(), |m| m.to_string())
                ),
                suggestion: None,
            });
        }

        Ok(parsed)
    }

    pub fn validate_port(field: &str, value: &str) -> ValidationResult<u16> {
        match value.parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ConfigValidationError {
                field: field.to_string(),
                value: value.to_string(),
                error_type: ConfigErrorType::InvalidRange,
                message: "Port must be a number between 1 and 65535".to_string(),
                suggestion: Some(format!("Use the default port {}", defaults::PORT)),
            }),
        }
    }

    pub fn validate_ip(field: &str, value: &str) -> ValidationResult<String> {
        IpAddr::from_str(value)
            .map(|_| value.to_string())
            .map_err(|_| ConfigValidationError {
                field: field.to_string(),
                value: value.to_string(),
                error_type: ConfigErrorType::InvalidFormat,
                message: "Invalid IP address".to_string(),
                suggestion: Some("Use 0.0.0.0 to listen on all interfaces".to_string()),
            })
    }

    pub fn validate_directory(field: &str, value: &str) -> ValidationResult<PathBuf> {
        let path = PathBuf::from(value);
        if Path::new(value).is_dir() {
            Ok(path)
        } else {
            Err(ConfigValidationError {
                field: field.to_string(),
                value: value.to_string(),
                error_type: ConfigErrorType::DirectoryNotFound,
                message: "Directory does not exist; static files will return 404".to_string(),
                suggestion: None,
            })
        }
    }
}

pub struct GatewayConfigValidator;

impl GatewayConfigValidator {
    /// Validate the process environment and build the gateway configuration
    pub fn validate_and_load() -> Result<GatewayConfig, ValidationResults> {
        Self::validate_with(get_env_optional)
    }

    /// Validate configuration values provided by `lookup`
    ///
    /// `lookup` returns `None` for unset parameters; empty strings are treated as unset.
    pub fn validate_with<F>(lookup: F) -> Result<GatewayConfig, ValidationResults>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut results = ValidationResults::new();
        let mut config = GatewayConfig::new("", "");

        for param in CONFIG_PARAMS {
            let value = lookup(param.name)
                .filter(|v| !v.is_empty())
                .or_else(|| param.default_value.map(String::from))
                .unwrap_or_default();

            if value.is_empty() {
                if param.required {
                    results.add(
                        param.validation_level,
                        ConfigValidationError {
                            field: param.name.to_string(),
                            value: String::new(),
                            error_type: ConfigErrorType::Required,
                            message: format!("{} environment variable is required", param.name),
                            suggestion: Some(format!("Set {}", param.name)),
                        },
                    );
                }
                continue;
            }

            if let Err(error) = Self::validate_and_store_parameter(param, &value, &mut config) {
                results.add(param.validation_level, error);
            }
        }

        results.print_summary();

        if results.is_valid() {
            Ok(config)
        } else {
            Err(results)
        }
    }

    fn validate_and_store_parameter(
        param: &ConfigParam,
        value: &str,
        config: &mut GatewayConfig,
    ) -> ValidationResult<()> {
        match param.param_type {
            ConfigType::String => match param.name {
                "MODEL_NAME" => config.model_name = value.to_string(),
                "LLM_MODEL" => config.llm_model = value.to_string(),
                _ => {}
            },
            ConfigType::Url => {
                let url = validators::validate_url(param.name, value)?;
                match param.name {
                    "INFERENCE_URL" => config.inference_url = url,
                    "LLM_URL" => config.llm_url = url,
                    _ => {}
                }
            }
            ConfigType::UnsignedInteger => {
                let parsed =
                    validators::validate_usize(param.name, value, param.min_value, param.max_value)?;
                match param.name {
                    "HTTP_WORKER_NUMBER" => config.workers = parsed,
                    "MAX_UPLOAD_SIZE" => config.max_upload_size = parsed,
                    _ => {}
                }
            }
            ConfigType::IpAddress => {
                config.host = validators::validate_ip(param.name, value)?;
            }
            ConfigType::Port => {
                config.port = validators::validate_port(param.name, value)?;
            }
            ConfigType::DirectoryPath => {
                // Keep the configured path even when missing so the warning is the only effect
                config.static_dir = PathBuf::from(value);
                validators::validate_directory(param.name, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_required_urls_missing() {
        let results = GatewayConfigValidator::validate_with(lookup(&[])).unwrap_err();
        let fields: Vec<&str> = results.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["INFERENCE_URL", "LLM_URL"]);
        assert!(results
            .errors
            .iter()
            .all(|e| e.error_type == ConfigErrorType::Required));
    }

    #[test]
    fn test_empty_required_url_is_missing() {
        let results = GatewayConfigValidator::validate_with(lookup(&[
            ("INFERENCE_URL", ""),
            ("LLM_URL", "http://h2"),
        ]))
        .unwrap_err();
        assert_eq!(results.errors.len(), 1);
        assert_eq!(results.errors[0].field, "INFERENCE_URL");
    }

    #[test]
    fn test_defaults_and_trailing_slash() {
        let config = GatewayConfigValidator::validate_with(lookup(&[
            ("INFERENCE_URL", "http://h1/"),
            ("LLM_URL", "http://h2/"),
        ]))
        .unwrap();

        assert_eq!(config.inference_url, "http://h1");
        assert_eq!(config.llm_url, "http://h2");
        assert_eq!(config.model_name, "whisper-1");
        assert_eq!(config.llm_model, "gpt-3.5-turbo");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_size, 100 * 1024 * 1024);
        assert_eq!(
            config.transcription_endpoint(),
            "http://h1/v1/audio/transcriptions"
        );
        assert_eq!(config.chat_endpoint(), "http://h2/v1/chat/completions");
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfigValidator::validate_with(lookup(&[
            ("INFERENCE_URL", "https://whisper.internal:9000"),
            ("LLM_URL", "http://llm"),
            ("MODEL_NAME", "large-v3"),
            ("LLM_MODEL", "llama3"),
            ("PORT", "9090"),
            ("HOST", "127.0.0.1"),
            ("HTTP_WORKER_NUMBER", "4"),
        ]))
        .unwrap();

        assert_eq!(config.model_name, "large-v3");
        assert_eq!(config.llm_model, "llama3");
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn test_empty_optional_values_use_defaults() {
        let config = GatewayConfigValidator::validate_with(lookup(&[
            ("INFERENCE_URL", "http://h1"),
            ("LLM_URL", "http://h2"),
            ("MODEL_NAME", ""),
            ("PORT", ""),
        ]))
        .unwrap();
        assert_eq!(config.model_name, "whisper-1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_values_are_all_reported() {
        let results = GatewayConfigValidator::validate_with(lookup(&[
            ("INFERENCE_URL", "ftp://h1"),
            ("LLM_URL", "not a url"),
            ("PORT", "70000"),
            ("HTTP_WORKER_NUMBER", "500"),
        ]))
        .unwrap_err();

        assert_eq!(results.errors.len(), 4);
        assert!(!results.is_valid());
    }

    #[test]
    fn test_missing_static_dir_is_a_warning() {
        let config = GatewayConfigValidator::validate_with(lookup(&[
            ("INFERENCE_URL", "http://h1"),
            ("LLM_URL", "http://h2"),
            ("STATIC_DIR", "/definitely/not/here"),
        ]))
        .unwrap();
        assert_eq!(config.static_dir, PathBuf::from("/definitely/not/here"));
    }
}
