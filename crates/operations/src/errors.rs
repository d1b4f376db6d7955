//! Error taxonomy shared by every surface.
//!
//! [`AdsMediaError`] has exactly four kinds. None of them are retried locally:
//! sending an email is not idempotent, so a blind retry may duplicate delivery.
//! Callers needing at-most-once delivery deduplicate on the message id returned
//! by a previous successful response.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback message used when the remote service rejects a request without
/// supplying `error.message`.
pub const GENERIC_API_ERROR: &str = "API Error";

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, AdsMediaError>;

/// Stable, machine-readable classification of an [`AdsMediaError`].
///
/// Rendered as the `error.code` of JSON surfaces and used by the CLI to select
/// a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing local input; no request was sent.
    Validation,
    /// The remote service rejected the request.
    ApiError,
    /// The request never produced an HTTP response.
    Transport,
    /// A 2xx response whose body is not an envelope.
    MalformedResponse,
}

impl ErrorKind {
    /// Returns the snake_case tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::ApiError => "api_error",
            ErrorKind::Transport => "transport",
            ErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single operation invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdsMediaError {
    /// Caller input was rejected before any network call was attempted.
    #[error("Validation error: {message}")]
    Validation {
        /// Names the offending parameter(s).
        message: String,
    },

    /// The remote service answered with a non-2xx status or `success: false`.
    #[error("API error: {message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Remote error code (`error.code`), when supplied.
        code: Option<String>,
        /// `error.message`, or [`GENERIC_API_ERROR`] when absent.
        message: String,
    },

    /// Network failure: DNS, connect, TLS, timeout, or body read.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },

    /// A 2xx response whose body could not be parsed as an envelope.
    #[error("Malformed response (HTTP {status}): {message}")]
    MalformedResponse {
        /// HTTP status of the response.
        status: u16,
        /// Parser diagnostic.
        message: String,
    },
}

impl AdsMediaError {
    /// Shorthand for a [`AdsMediaError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`AdsMediaError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdsMediaError::Validation { .. } => ErrorKind::Validation,
            AdsMediaError::Api { .. } => ErrorKind::ApiError,
            AdsMediaError::Transport { .. } => ErrorKind::Transport,
            AdsMediaError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    /// Returns the bare message without the kind prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            AdsMediaError::Validation { message }
            | AdsMediaError::Api { message, .. }
            | AdsMediaError::Transport { message }
            | AdsMediaError::MalformedResponse { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_are_stable() {
        let err = AdsMediaError::Api {
            status: 401,
            code: Some("unauthorized".into()),
            message: "Invalid key".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ApiError);
        assert_eq!(err.kind().as_str(), "api_error");
        assert_eq!(err.message(), "Invalid key");
        assert_eq!(err.to_string(), "API error: Invalid key");
    }

    #[test]
    fn test_validation_display_includes_message() {
        let err = AdsMediaError::validation("missing required parameter 'id'");
        assert_eq!(
            err.to_string(),
            "Validation error: missing required parameter 'id'"
        );
    }
}
