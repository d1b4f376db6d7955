//! The transport port and the single invocation path every surface uses.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info_span, warn, Instrument};

use crate::{
    map_request, normalize_response, ApiKey, ApiRequest, InvocationId, Operation, RawResponse,
    Result,
};

/// Performs exactly one HTTP exchange for a mapped request.
///
/// Implementations attach `Authorization: Bearer <key>` on every call and
/// `Content-Type: application/json` whenever [`ApiRequest::body`] is `Some`.
/// They must not retry. Any failure that prevents an HTTP response from being
/// read is reported as [`AdsMediaError::Transport`](crate::AdsMediaError::Transport);
/// non-2xx statuses are *not* errors at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, api_key: &ApiKey, request: &ApiRequest) -> Result<RawResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn execute(&self, api_key: &ApiKey, request: &ApiRequest) -> Result<RawResponse> {
        (**self).execute(api_key, request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, api_key: &ApiKey, request: &ApiRequest) -> Result<RawResponse> {
        (**self).execute(api_key, request).await
    }
}

/// Maps, sends and normalises one operation call.
///
/// Validation failures return before `transport` is touched.
pub async fn invoke<T>(
    transport: &T,
    api_key: &ApiKey,
    operation: Operation,
    params: &Map<String, Value>,
) -> Result<Value>
where
    T: Transport + ?Sized,
{
    let invocation_id = InvocationId::new_random();
    let span = info_span!("invoke", %invocation_id, %operation);

    async move {
        let request = map_request(operation, params)?;
        debug!(method = %request.method, path = request.path, "Dispatching request");

        let response = transport.execute(api_key, &request).await?;
        debug!(status = response.status, bytes = response.body.len(), "Received response");

        normalize_response(&response).inspect_err(|e| {
            warn!(kind = %e.kind(), status = response.status, error = %e, "Operation failed");
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{AdsMediaError, HttpMethod};

    fn key() -> ApiKey {
        ApiKey::new("test-key").unwrap()
    }

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_missing_identifier_never_reaches_transport() {
        for op in Operation::ALL {
            if !op.descriptor().params.iter().any(|p| p.required) {
                continue;
            }
            let mut transport = MockTransport::new();
            transport.expect_execute().never();

            let err = invoke(&transport, &key(), *op, &Map::new()).await.unwrap_err();
            assert!(matches!(err, AdsMediaError::Validation { .. }), "{op}");
        }
    }

    #[tokio::test]
    async fn test_successful_call_returns_unwrapped_data() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .withf(|key, request| {
                key.expose() == "test-key"
                    && request.method == HttpMethod::Post
                    && request.path == "/send"
            })
            .times(1)
            .returning(|_, _| {
                Ok(RawResponse::new(
                    200,
                    serde_json::to_vec(&json!({
                        "success": true,
                        "data": { "message_id": "m1", "send_id": 42, "status": "sent" },
                        "timestamp": "2025-01-01T00:00:00Z"
                    }))
                    .unwrap(),
                ))
            });

        let data = invoke(
            &transport,
            &key(),
            Operation::SendEmail,
            &as_map(json!({ "to": "a@example.com", "subject": "Hi", "html": "<p>x</p>" })),
        )
        .await
        .unwrap();

        assert_eq!(data, json!({ "message_id": "m1", "send_id": 42, "status": "sent" }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced_unchanged() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_, _| Err(AdsMediaError::transport("connection refused")));

        let err = invoke(&transport, &key(), Operation::Ping, &Map::new())
            .await
            .unwrap_err();
        assert_eq!(err, AdsMediaError::transport("connection refused"));
    }

    #[tokio::test]
    async fn test_api_rejection_is_not_retried() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(1).returning(|_, _| {
            Ok(RawResponse::new(
                503,
                br#"{"success":false,"error":{"message":"busy"}}"#.to_vec(),
            ))
        });

        let err = invoke(&transport, &key(), Operation::GetAccount, &Map::new())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "busy");
    }
}
