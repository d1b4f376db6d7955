//! Shared value types: the normalised request description, the raw response
//! handed back by a transport, and the typed payloads used by the SDK.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CampaignId, ListId, MessageId, Operation, SendId, ServerId};

// ---------------------------------------------------------------------------
// HTTP request description
// ---------------------------------------------------------------------------

/// HTTP verbs used by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case verb.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalised description of one HTTP call, produced by
/// [`map_request`](crate::map_request) and consumed by a
/// [`Transport`](crate::Transport).
///
/// Query parameters keep descriptor order; body keys are sorted (the
/// `serde_json` map is ordered), so equal inputs always serialise to equal
/// bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    /// Operation this request was mapped from.
    pub operation: Operation,
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path relative to the API base URL, always starting with `/`.
    pub path: &'static str,
    /// Query parameters as already-stringified pairs.
    pub query: Vec<(String, String)>,
    /// JSON body; `None` means no body and no `Content-Type` header.
    pub body: Option<Map<String, Value>>,
}

impl ApiRequest {
    /// Renders the path with its percent-encoded query string.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.to_string();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Canonical byte form of the description, used for equality checks and
    /// request fingerprints.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Status and body of one HTTP response, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parses an RFC 3339 timestamp as reported in the envelope.
    pub fn parse_rfc3339(value: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Typed payloads
//
// Optional fields are skipped when `None` so that converting a payload to a
// parameter map never introduces explicit nulls.
// ---------------------------------------------------------------------------

/// Content type flag accepted by send and campaign endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// HTML with a text alternative (server default).
    HtmlAndText,
    HtmlOnly,
    TextOnly,
}

impl ContentType {
    pub fn as_u8(self) -> u8 {
        match self {
            ContentType::HtmlAndText => 1,
            ContentType::HtmlOnly => 2,
            ContentType::TextOnly => 3,
        }
    }
}

impl Serialize for ContentType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Single transactional email (`send_email`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendEmail {
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<ServerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribe_url: Option<String>,
}

impl SendEmail {
    /// Starts an HTML email; further fields are set directly on the struct.
    pub fn html(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: Some(html.into()),
            ..Self::default()
        }
    }
}

/// One recipient of a batch send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Batch marketing send (`send_batch`), up to 1000 recipients.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendBatch {
    pub recipients: Vec<Recipient>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<ServerId>,
}

/// A contact added to a list. Field names follow the remote API's camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom2: Option<String>,
}

impl Contact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            custom1: None,
            custom2: None,
        }
    }
}

/// Fields of a new campaign (`create_campaign`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewCampaign {
    pub name: String,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
}

/// Partial campaign update (`update_campaign`); only `Some` fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preheader: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
}

/// A new sending task (`create_schedule`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSchedule {
    pub campaign_id: CampaignId,
    pub list_id: ListId,
    pub server_id: ServerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    /// `YYYY-MM-DD HH:MM:SS`; omitted means "send now".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// Partial schedule update (`update_schedule`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// `data` of a successful `/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResult {
    pub message_id: MessageId,
    pub send_id: SendId,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}
