//! MCP request handler.

use std::sync::Arc;

use operations::{invoke, AdsMediaError, ApiKey, Operation, Transport};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::protocol::{
    McpRequest, McpResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::tools::tool_definitions;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

/// Dispatches JSON-RPC requests to the operation registry.
///
/// Every tool call goes through [`operations::invoke`] with the key the
/// handler was built with.
pub struct McpHandler {
    transport: Arc<dyn Transport>,
    api_key: ApiKey,
    server_info: ServerInfo,
}

impl McpHandler {
    pub fn new(transport: Arc<dyn Transport>, api_key: ApiKey) -> Self {
        Self {
            transport,
            api_key,
            server_info: ServerInfo {
                name: "adsmedia-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Handles one request. Returns `None` for notifications.
    pub async fn handle(&self, request: McpRequest) -> Option<McpResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Ignoring notification");
            return None;
        }
        if request.jsonrpc != "2.0" {
            return Some(McpResponse::error(
                request.id,
                INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => McpResponse::success(request.id, json!({})),
            "tools/list" => {
                McpResponse::success(request.id, json!({ "tools": tool_definitions() }))
            }
            "tools/call" => self.handle_call_tool(request.id, request.params).await,
            _ => McpResponse::error(request.id, METHOD_NOT_FOUND, "Method not found"),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> McpResponse {
        McpResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": self.server_info,
                "capabilities": {
                    "tools": {}
                }
            }),
        )
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Value) -> McpResponse {
        let tool_name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => return McpResponse::error(id, INVALID_PARAMS, "Missing tool name"),
        };
        let operation = match Operation::from_name(tool_name) {
            Some(op) => op,
            None => {
                return McpResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {tool_name}"))
            }
        };
        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return McpResponse::error(id, INVALID_PARAMS, "Tool arguments must be an object")
            }
        };

        match invoke(&*self.transport, &self.api_key, operation, &arguments).await {
            Ok(data) => McpResponse::success(id, tool_result(&data, false)),
            Err(e) => {
                warn!(%operation, kind = %e.kind(), "Tool call failed");
                McpResponse::success(id, tool_error(&e))
            }
        }
    }

    /// Parses and handles one line of JSON. Returns `None` when no response
    /// should be written.
    pub async fn handle_json(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => self.handle(request).await?,
            Err(e) => McpResponse::error(None, PARSE_ERROR, format!("Parse error: {e}")),
        };
        serde_json::to_string(&response).ok()
    }
}

fn tool_result(payload: &Value, is_error: bool) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": serde_json::to_string_pretty(payload).unwrap_or_default()
        }],
        "isError": is_error
    })
}

fn tool_error(error: &AdsMediaError) -> Value {
    tool_result(&json!({ "error": error.message() }), true)
}
