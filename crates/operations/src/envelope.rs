//! The response envelope and the normaliser that unwraps it.
//!
//! Every API response is `{success, data, error?, timestamp}`. A call fails
//! when the HTTP status is non-2xx **or** `success` is false; either signal on
//! its own is enough.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AdsMediaError, RawResponse, Result, Timestamp, GENERIC_API_ERROR};

/// `error` member of an envelope.
///
/// Most responses carry `{code, message}`; some deployments send a bare
/// string, which is treated as the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Text(String),
}

impl ErrorBody {
    /// Remote error code rendered as a string (numeric codes are stringified).
    pub fn code(&self) -> Option<String> {
        match self {
            ErrorBody::Detailed { code: Some(Value::String(s)), .. } => Some(s.clone()),
            ErrorBody::Detailed {
                code: Some(Value::Null) | None,
                ..
            } => None,
            ErrorBody::Detailed { code: Some(other), .. } => Some(other.to_string()),
            ErrorBody::Text(_) => None,
        }
    }

    /// Human-readable message, if the server supplied a non-empty one.
    pub fn message(&self) -> Option<&str> {
        let message = match self {
            ErrorBody::Detailed { message, .. } => message.as_deref(),
            ErrorBody::Text(text) => Some(text.as_str()),
        };
        message.filter(|m| !m.trim().is_empty())
    }
}

/// Response wrapper returned by every remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Envelope {
    /// A failed envelope stamped with the current time.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody::Detailed {
                code: Some(Value::String(code.into())),
                message: Some(message.into()),
            }),
            timestamp: Some(Timestamp::now().to_string()),
        }
    }

    /// Server-reported response time, when present and RFC 3339.
    pub fn reported_at(&self) -> Option<Timestamp> {
        self.timestamp.as_deref().and_then(Timestamp::parse_rfc3339)
    }

    /// Unwraps `data` or converts the envelope into an [`AdsMediaError::Api`]
    /// carrying the status of `response`.
    pub fn into_result(self, response: &RawResponse) -> Result<Value> {
        if response.is_success() && self.success {
            return Ok(self.data.unwrap_or(Value::Null));
        }
        let (code, message) = match &self.error {
            Some(error) => (
                error.code(),
                error.message().unwrap_or(GENERIC_API_ERROR).to_string(),
            ),
            None => (None, GENERIC_API_ERROR.to_string()),
        };
        Err(AdsMediaError::Api {
            status: response.status,
            code,
            message,
        })
    }
}

/// Turns an HTTP response into the unwrapped `data` or an error.
///
/// # Errors
///
/// - [`AdsMediaError::Api`] for a non-2xx status or `success: false`. A non-2xx
///   body that is not an envelope still yields `Api` with a generic message.
/// - [`AdsMediaError::MalformedResponse`] for a 2xx body that is not an
///   envelope.
pub fn normalize_response(response: &RawResponse) -> Result<Value> {
    let status = response.status;
    match serde_json::from_slice::<Envelope>(&response.body) {
        Ok(envelope) => envelope.into_result(response),
        Err(_) if !response.is_success() => Err(AdsMediaError::Api {
            status,
            code: None,
            message: format!("{GENERIC_API_ERROR} (HTTP {status})"),
        }),
        Err(e) => Err(AdsMediaError::MalformedResponse {
            status,
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn normalize(status: u16, body: &[u8]) -> Result<Value> {
        normalize_response(&RawResponse::new(status, body))
    }

    #[test]
    fn test_success_unwraps_data_exactly() {
        let raw = body(json!({
            "success": true,
            "data": { "message_id": "m1", "send_id": 42, "status": "sent" },
            "timestamp": "2025-01-01T00:00:00Z"
        }));
        let data = normalize(200, &raw).unwrap();
        assert_eq!(data, json!({ "message_id": "m1", "send_id": 42, "status": "sent" }));
    }

    #[test]
    fn test_unauthorized_carries_remote_message_and_code() {
        let raw = body(json!({
            "success": false,
            "error": { "code": "unauthorized", "message": "Invalid key" }
        }));
        let err = normalize(401, &raw).unwrap_err();
        assert_eq!(
            err,
            AdsMediaError::Api {
                status: 401,
                code: Some("unauthorized".into()),
                message: "Invalid key".into(),
            }
        );
    }

    #[test]
    fn test_success_false_with_2xx_still_fails() {
        let raw = body(json!({ "success": false, "error": { "message": "list not found" } }));
        let err = normalize(200, &raw).unwrap_err();
        assert_eq!(err.message(), "list not found");
        assert!(matches!(err, AdsMediaError::Api { status: 200, code: None, .. }));
    }

    #[test]
    fn test_missing_error_message_uses_fallback() {
        let raw = body(json!({ "success": false }));
        let err = normalize(200, &raw).unwrap_err();
        assert_eq!(err.message(), GENERIC_API_ERROR);
    }

    #[test]
    fn test_non_2xx_with_success_true_fails() {
        let raw = body(json!({ "success": true, "data": {} }));
        let err = normalize(500, &raw).unwrap_err();
        assert!(matches!(err, AdsMediaError::Api { status: 500, .. }));
    }

    #[test]
    fn test_bare_string_error_is_the_message() {
        let raw = body(json!({ "success": false, "error": "quota exceeded" }));
        assert_eq!(normalize(429, &raw).unwrap_err().message(), "quota exceeded");
    }

    #[test]
    fn test_numeric_error_code_is_stringified() {
        let raw = body(json!({ "success": false, "error": { "code": 1003, "message": "x" } }));
        let err = normalize(400, &raw).unwrap_err();
        assert!(matches!(err, AdsMediaError::Api { code: Some(ref c), .. } if c == "1003"));
    }

    #[test]
    fn test_unparseable_2xx_body_is_malformed() {
        let err = normalize(200, b"<html>gateway</html>").unwrap_err();
        assert!(matches!(err, AdsMediaError::MalformedResponse { status: 200, .. }));
    }

    #[test]
    fn test_2xx_body_without_success_field_is_malformed() {
        let err = normalize(200, &body(json!({ "data": {} }))).unwrap_err();
        assert!(matches!(err, AdsMediaError::MalformedResponse { .. }));
    }

    #[test]
    fn test_unparseable_non_2xx_body_is_api_error() {
        let err = normalize(502, b"Bad Gateway").unwrap_err();
        assert_eq!(err.message(), "API Error (HTTP 502)");
    }

    #[test]
    fn test_redirect_status_is_not_success() {
        let err = normalize(302, &body(json!({ "success": true, "data": {} }))).unwrap_err();
        assert!(matches!(err, AdsMediaError::Api { status: 302, .. }));
    }

    #[test]
    fn test_success_without_data_is_null() {
        assert_eq!(normalize(200, &body(json!({ "success": true }))).unwrap(), Value::Null);
    }

    #[test]
    fn test_failure_envelope_serialises_code_and_message() {
        let envelope = Envelope::failure("validation", "missing to");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"], json!({ "code": "validation", "message": "missing to" }));
        assert!(envelope.reported_at().is_some());
    }
}
