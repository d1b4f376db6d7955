//! Request/response contract for the ADSMedia email API.
//!
//! Every surface in this workspace (SDK, CLI, MCP tool server, HTTP forwarder)
//! does the same thing: take caller input for a named operation, map it onto
//! one REST endpoint, send it with a bearer token, and unwrap the JSON envelope.
//! This crate owns that contract once so no surface re-encodes it.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies. It
//! defines the [`Transport`] port; the `client` crate supplies the HTTP
//! implementation.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`operation`] | The operation registry (`Operation` → `OperationDescriptor`) |
//! | [`mapper`] | Caller parameters → [`ApiRequest`], with local validation |
//! | [`envelope`] | The `{success, data, error, timestamp}` wrapper and normaliser |
//! | [`transport`] | The [`Transport`] port and [`invoke`] |
//! | [`identifiers`] | Newtype identifiers (`CampaignId`, `ApiKey`, etc.) |
//! | [`types`] | Request description, raw response, typed payloads |
//! | [`errors`] | [`AdsMediaError`] and its [`ErrorKind`] |

pub mod envelope;
pub mod errors;
pub mod identifiers;
pub mod mapper;
pub mod operation;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use envelope::{normalize_response, Envelope, ErrorBody};
pub use errors::{AdsMediaError, ErrorKind, Result, GENERIC_API_ERROR};
pub use identifiers::{
    ApiKey, CampaignId, InvocationId, ListId, MessageId, ScheduleId, SendId, ServerId,
};
pub use mapper::map_request;
pub use operation::{
    Operation, OperationDescriptor, ParamKind, ParamLocation, ParamSpec, TOOL_PREFIX,
};
pub use transport::{invoke, Transport};
pub use types::{
    ApiRequest, CampaignUpdate, Contact, ContentType, HttpMethod, NewCampaign, NewSchedule,
    RawResponse, Recipient, ScheduleUpdate, SendBatch, SendEmail, SendResult, Timestamp,
};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.adsmedia.live/v1";
