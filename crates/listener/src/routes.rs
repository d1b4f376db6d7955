//! Router and request handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use operations::{invoke, ApiKey, Operation, Transport};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ListenerConfig;
use crate::error::ListenerError;
use crate::templates::{WebhookTemplate, WebhookTemplates, DEFAULT_FROM_NAME};

pub const API_KEY_HEADER: &str = "x-adsmedia-key";
/// Webhook recipient used when neither the payload nor configuration names one.
pub const NOTIFICATION_EMAIL_HEADER: &str = "x-notification-email";

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<dyn Transport>,
    pub config: Arc<ListenerConfig>,
    pub templates: Arc<WebhookTemplates>,
}

impl AppState {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: ListenerConfig,
    ) -> Result<Self, ListenerError> {
        Ok(Self {
            transport,
            config: Arc::new(config),
            templates: Arc::new(WebhookTemplates::new()?),
        })
    }

    /// Configured key, else the one supplied in the request header.
    fn api_key(&self, headers: &HeaderMap) -> Result<ApiKey, ListenerError> {
        if let Some(key) = &self.config.api_key {
            return Ok(key.clone());
        }
        headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(ApiKey::new)
            .ok_or(ListenerError::MissingApiKey)
    }

    async fn forward(
        &self,
        headers: &HeaderMap,
        operation: Operation,
        params: &Map<String, Value>,
    ) -> Result<Json<Value>, ListenerError> {
        let api_key = self.api_key(headers)?;
        let data = invoke(&*self.transport, &api_key, operation, params).await?;
        Ok(Json(json!({ "success": true, "data": data })))
    }
}

type HandlerResult = Result<Json<Value>, ListenerError>;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    Router::new()
        .route("/ping", get(ping))
        .route("/send", post(send))
        .route("/send/batch", post(send_batch))
        .route("/check", get(check))
        .route("/operations/{name}", post(call_operation))
        .route("/webhook", post(webhook))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Empty bodies read as `{}`; anything other than a JSON object is rejected.
fn json_object(body: &Bytes) -> Result<Map<String, Value>, ListenerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ListenerError::InvalidBody("expected a JSON object".to_string())),
        Err(e) => Err(ListenerError::InvalidBody(e.to_string())),
    }
}

async fn ping(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    state.forward(&headers, Operation::Ping, &Map::new()).await
}

async fn send(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> HandlerResult {
    let params = json_object(&body)?;
    state.forward(&headers, Operation::SendEmail, &params).await
}

async fn send_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult {
    let params = json_object(&body)?;
    state.forward(&headers, Operation::SendBatch, &params).await
}

#[derive(Debug, Deserialize)]
struct CheckQuery {
    email: Option<String>,
}

async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CheckQuery>,
) -> HandlerResult {
    let mut params = Map::new();
    if let Some(email) = query.email {
        params.insert("email".to_string(), Value::String(email));
    }
    state
        .forward(&headers, Operation::CheckSuppression, &params)
        .await
}

async fn call_operation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    body: Bytes,
) -> HandlerResult {
    let operation =
        Operation::from_name(&name).ok_or_else(|| ListenerError::UnknownOperation(name))?;
    let params = json_object(&body)?;
    state.forward(&headers, operation, &params).await
}

#[derive(Debug, Deserialize)]
struct WebhookQuery {
    #[serde(rename = "type")]
    template: Option<String>,
}

async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WebhookQuery>,
    body: Bytes,
) -> HandlerResult {
    let api_key = state.api_key(&headers)?;
    let payload = json_object(&body)?;

    let template = WebhookTemplate::select(&payload, query.template.as_deref());
    let to = ["to", "email", "recipient"]
        .iter()
        .filter_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| state.config.notification_email.clone())
        .or_else(|| header_text(&headers, NOTIFICATION_EMAIL_HEADER))
        .ok_or(ListenerError::MissingRecipient)?;

    let data = match payload.get("data") {
        Some(data @ Value::Object(_)) => data.clone(),
        _ => Value::Object(payload.clone()),
    };
    let email = state.templates.render(template, &data)?;
    let from_name = payload
        .get("from_name")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_FROM_NAME);

    info!(?template, "Sending webhook notification");
    let mut params = Map::new();
    params.insert("to".to_string(), Value::String(to));
    params.insert("subject".to_string(), Value::String(email.subject));
    params.insert("html".to_string(), Value::String(email.html));
    params.insert("from_name".to_string(), Value::String(from_name.to_string()));

    let data = invoke(&*state.transport, &api_key, Operation::SendEmail, &params).await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

async fn not_found() -> ListenerError {
    ListenerError::NotFound
}
