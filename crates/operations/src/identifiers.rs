//! Newtype domain identifiers.
//!
//! Every remote entity the API hands back an identifier for is represented as a
//! distinct newtype wrapping a primitive. This prevents accidentally passing a
//! [`ListId`] where a [`CampaignId`] is expected even though both are `u64` on
//! the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (server-assigned integers).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: server-assigned integers
// ---------------------------------------------------------------------------

u64_id! {
    /// Identifies an email campaign (subject + content template).
    CampaignId
}

u64_id! {
    /// Identifies a subscriber list.
    ListId
}

u64_id! {
    /// Identifies a schedule (sending task). Statistics and event endpoints
    /// are keyed by the same number.
    ScheduleId
}

u64_id! {
    /// Identifies a sending server.
    ServerId
}

u64_id! {
    /// Numeric identifier of a single transactional send, returned by `/send`.
    SendId
}

// ---------------------------------------------------------------------------
// Identifiers: server-assigned strings
// ---------------------------------------------------------------------------

string_id! {
    /// Message identifier returned by `/send`; usable for status lookups and
    /// caller-side deduplication.
    MessageId
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single invocation (one mapper → transport → normaliser pass).
///
/// Generated fresh for every call and recorded on the `invoke` span so the log
/// lines belonging to one request can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(Uuid);

impl InvocationId {
    /// Generates a new random invocation identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Bearer token used to authenticate against the API.
///
/// `Debug` never prints the secret and there is no `Display` implementation;
/// call [`ApiKey::expose`] at the point the header is built.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new key, returning `None` if the value is empty or whitespace.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the raw secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
