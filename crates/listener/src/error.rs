//! Error type for the forwarder and its JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use operations::AdsMediaError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListenerError {
    /// Neither configuration nor the `x-adsmedia-key` header supplied a key.
    #[error("API key required")]
    MissingApiKey,

    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("Not found")]
    NotFound,

    /// Request body was not a JSON object.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Webhook payload named no recipient and no default is configured.
    #[error("Recipient email required")]
    MissingRecipient,

    /// A webhook template failed to register or render.
    #[error("Template error: {0}")]
    Template(String),

    #[error(transparent)]
    Operation(#[from] AdsMediaError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),
}

impl ListenerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey => StatusCode::UNAUTHORIZED,
            Self::UnknownOperation(_) | Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidBody(_) | Self::MissingRecipient => StatusCode::BAD_REQUEST,
            Self::Operation(e) => operation_status(e),
            Self::Template(_) | Self::Bind { .. } | Self::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "missing_api_key",
            Self::UnknownOperation(_) | Self::NotFound => "not_found",
            Self::InvalidBody(_) => "invalid_body",
            Self::MissingRecipient => "missing_recipient",
            Self::Operation(e) => e.kind().as_str(),
            Self::Template(_) | Self::Bind { .. } | Self::Server(_) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Operation(e) => e.message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Upstream 4xx/5xx statuses pass through; anything else becomes 502.
fn operation_status(error: &AdsMediaError) -> StatusCode {
    match error {
        AdsMediaError::Validation { .. } => StatusCode::BAD_REQUEST,
        AdsMediaError::Api { status, .. } => StatusCode::from_u16(*status)
            .ok()
            .filter(|s| s.is_client_error() || s.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        AdsMediaError::Transport { .. } | AdsMediaError::MalformedResponse { .. } => {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl IntoResponse for ListenerError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": { "code": self.code(), "message": self.message() }
        });
        (self.status(), Json(body)).into_response()
    }
}
