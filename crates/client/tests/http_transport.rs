//! End-to-end tests for `HttpTransport` against a local axum server.
//!
//! The server records what it receives so the tests can check headers, query
//! strings and bodies exactly as they went over the wire.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use client::{AdsMediaClient, ClientConfig, EndpointConfig, HttpTransport};
use operations::{AdsMediaError, ApiKey, CampaignId, SendEmail};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    uri: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl Recorder {
    fn last(&self) -> Seen {
        self.0.lock().unwrap().last().cloned().unwrap()
    }
}

async fn fake_api(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    recorder.0.lock().unwrap().push(Seen {
        method,
        uri: uri.to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    match uri.path() {
        "/v1/send" => (
            StatusCode::OK,
            json!({
                "success": true,
                "data": { "message_id": "m1", "send_id": 42, "status": "sent" },
                "timestamp": "2025-01-01T00:00:00Z"
            })
            .to_string(),
        ),
        "/v1/campaigns/get" => (
            StatusCode::UNAUTHORIZED,
            json!({
                "success": false,
                "error": { "code": "unauthorized", "message": "Invalid key" }
            })
            .to_string(),
        ),
        "/v1/account" => (StatusCode::OK, "<html>maintenance</html>".to_string()),
        _ => (
            StatusCode::OK,
            json!({ "success": true, "data": { "pong": true } }).to_string(),
        ),
    }
}

async fn start_fake_api() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .fallback(fake_api)
        .with_state(recorder.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1"), recorder)
}

fn client_for(base_url: &str) -> AdsMediaClient<HttpTransport> {
    let config = ClientConfig::new(ApiKey::new("secret").unwrap())
        .with_endpoint(EndpointConfig::new(base_url).unwrap());
    AdsMediaClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_send_email_over_the_wire() {
    let (base_url, recorder) = start_fake_api().await;
    let client = client_for(&base_url);

    let receipt = client
        .send_email(&SendEmail::html("a@example.com", "Hi", "<p>x</p>"))
        .await
        .unwrap();
    assert_eq!(receipt.message_id.as_str(), "m1");
    assert_eq!(receipt.status, "sent");

    let seen = recorder.last();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.uri, "/v1/send");
    assert_eq!(seen.authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(
        body,
        json!({ "to": "a@example.com", "subject": "Hi", "html": "<p>x</p>" })
    );
}

#[tokio::test]
async fn test_get_request_has_query_and_no_content_type() {
    let (base_url, recorder) = start_fake_api().await;
    let client = client_for(&base_url);

    client.check_suppression("a+b@example.com").await.unwrap();

    let seen = recorder.last();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.uri, "/v1/suppressions/check?email=a%2Bb%40example.com");
    assert_eq!(seen.content_type, None);
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_unauthorized_response_is_api_error() {
    let (base_url, _recorder) = start_fake_api().await;
    let client = client_for(&base_url);

    let err = client.get_campaign(CampaignId::new(1)).await.unwrap_err();
    assert_eq!(
        err,
        AdsMediaError::Api {
            status: 401,
            code: Some("unauthorized".into()),
            message: "Invalid key".into(),
        }
    );
}

#[tokio::test]
async fn test_html_body_on_success_status_is_malformed() {
    let (base_url, _recorder) = start_fake_api().await;
    let client = client_for(&base_url);

    let err = client.get_account().await.unwrap_err();
    assert!(matches!(err, AdsMediaError::MalformedResponse { status: 200, .. }));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{addr}/v1"));
    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, AdsMediaError::Transport { .. }));
}
