//! ADSMedia MCP tool server.
//!
//! Exposes every registry operation as an MCP tool named
//! `adsmedia_<operation>` and speaks JSON-RPC 2.0 over newline-delimited
//! stdio.
//!
//! ## Architectural Layer
//!
//! **Adapter.** Depends on [`operations`] only; the concrete transport is
//! injected by the composition root.
//!
//! ## Module Layout
//!
//! | Module       | Responsibility                                     |
//! |--------------|----------------------------------------------------|
//! | [`protocol`] | JSON-RPC request/response/error types              |
//! | [`tools`]    | Tool definitions and input schemas                 |
//! | [`handler`]  | Method dispatch and tool invocation                |
//! | [`server`]   | Line-oriented read/dispatch/write loop             |

pub mod handler;
pub mod protocol;
pub mod server;
pub mod tools;

pub use handler::{McpHandler, PROTOCOL_VERSION};
pub use protocol::{McpError, McpRequest, McpResponse};
pub use server::{serve, serve_stdio};
pub use tools::{input_schema, tool_definition, tool_definitions};
