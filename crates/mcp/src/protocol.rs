//! JSON-RPC 2.0 message types used by the MCP transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

/// MCP request structure
///
/// A request without an `id` is a notification and gets no response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl McpRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// MCP response structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    /// Always present; `null` when the request id could not be read.
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP error structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl McpResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcp_response_success() {
        let response = McpResponse::success(Some(serde_json::json!(1)), serde_json::json!({"ok": true}));
        assert!(response.error.is_none());
        assert!(response.result.is_some());
    }

    #[test]
    fn test_mcp_response_error_omits_result() {
        let response = McpResponse::error(Some(serde_json::json!(1)), INVALID_REQUEST, "Invalid request");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["error"]["code"], -32600);
    }

    #[test]
    fn test_mcp_response_without_id_serializes_null_id() {
        let response = McpResponse::error(None, PARSE_ERROR, "Parse error");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json.get("id"), Some(&Value::Null));
        assert_eq!(json["error"]["code"], -32700);
    }

    #[test]
    fn test_request_without_id_is_notification() {
        let request: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).unwrap();
        assert!(request.is_notification());
        assert!(request.params.is_null());
    }
}
