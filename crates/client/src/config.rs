//! Client configuration, loaded from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `ADSMEDIA_API_KEY` | Bearer token | required |
//! | `ADSMEDIA_BASE_URL` | API base URL | [`DEFAULT_BASE_URL`] |
//! | `ADSMEDIA_TIMEOUT_SECS` | HTTP timeout override | HTTP client default |

use std::env;
use std::time::Duration;

use operations::{ApiKey, DEFAULT_BASE_URL};
use thiserror::Error;

pub const API_KEY_VAR: &str = "ADSMEDIA_API_KEY";
pub const BASE_URL_VAR: &str = "ADSMEDIA_BASE_URL";
pub const TIMEOUT_VAR: &str = "ADSMEDIA_TIMEOUT_SECS";

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },

    #[error("Invalid base URL '{0}': expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load an environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load an environment variable or return an error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Where and how to reach the API, without credentials.
///
/// Credentials are passed per call (see [`operations::Transport`]), so one
/// endpoint configuration can serve callers holding different keys.
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl EndpointConfig {
    /// Validates and normalises `base_url` (trailing slashes are dropped).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = base_url.into();
        let trimmed = raw.trim().trim_end_matches('/');
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(ConfigError::InvalidBaseUrl(raw));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl FromEnv for EndpointConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(env_or_default(BASE_URL_VAR, DEFAULT_BASE_URL))?;
        if let Ok(raw) = env::var(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::ParseError {
                key: TIMEOUT_VAR.to_string(),
                details: format!("{}", e),
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// Endpoint plus the API key: everything a single-tenant caller needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    pub endpoint: EndpointConfig,
}

impl ClientConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            endpoint: EndpointConfig::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoint = endpoint;
        self
    }
}

impl FromEnv for ClientConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = ApiKey::new(env_required(API_KEY_VAR)?)
            .ok_or_else(|| ConfigError::MissingEnvVar(API_KEY_VAR.to_string()))?;
        Ok(Self {
            api_key,
            endpoint: EndpointConfig::from_env()?,
        })
    }
}
