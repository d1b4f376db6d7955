//! The operation registry: the single table mapping every remote operation to
//! its HTTP method, path and parameter list.
//!
//! Every surface (SDK, CLI, MCP tools, HTTP forwarder) reads this table instead
//! of re-encoding endpoints. Adding an endpoint means adding one entry to the
//! `operations!` invocation below.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AdsMediaError, HttpMethod};

/// Prefix used for tool names exposed to MCP clients.
pub const TOOL_PREFIX: &str = "adsmedia_";

// ---------------------------------------------------------------------------
// Parameter specifications
// ---------------------------------------------------------------------------

/// JSON kind a parameter value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ParamKind {
    /// JSON-schema `type` keyword for this kind.
    pub fn json_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
        }
    }
}

/// Where a parameter travels in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamLocation {
    Query,
    Body,
}

/// One declared parameter of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub location: ParamLocation,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    /// An optional query-string parameter.
    pub const fn query(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            location: ParamLocation::Query,
            required: false,
            description,
        }
    }

    /// An optional body parameter.
    pub const fn body(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            location: ParamLocation::Body,
            required: false,
            description,
        }
    }

    /// Marks the parameter as required.
    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Static description of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub operation: Operation,
    /// snake_case operation name, e.g. `"send_email"`.
    pub name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    /// Declared parameters in the order they are emitted.
    pub params: &'static [ParamSpec],
}

impl OperationDescriptor {
    /// Looks up a declared parameter by name.
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Returns `true` if any declared parameter travels in the body.
    pub fn has_body(&self) -> bool {
        self.params
            .iter()
            .any(|p| p.location == ParamLocation::Body)
    }

    /// Parameters of which at least one must be present.
    ///
    /// Only `send_email` has such a group (`html` / `text`).
    pub fn at_least_one_of(&self) -> &'static [&'static str] {
        match self.operation {
            Operation::SendEmail => &["html", "text"],
            _ => &[],
        }
    }

    /// Name under which the operation is exposed as an MCP tool.
    pub fn tool_name(&self) -> String {
        format!("{TOOL_PREFIX}{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

macro_rules! operations {
    (
        $(
            $(#[$attr:meta])*
            $variant:ident => $name:literal, $method:ident $path:literal,
                $description:literal,
                [$($param:expr),* $(,)?];
        )*
    ) => {
        /// Every operation the remote API exposes.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum Operation {
            $($(#[$attr])* $variant,)*
        }

        impl Operation {
            /// All operations in registry order.
            pub const ALL: &'static [Operation] = &[$(Operation::$variant),*];

            /// Returns the static descriptor for this operation.
            pub fn descriptor(self) -> &'static OperationDescriptor {
                match self {
                    $(
                        Operation::$variant => {
                            static DESCRIPTOR: OperationDescriptor = OperationDescriptor {
                                operation: Operation::$variant,
                                name: $name,
                                description: $description,
                                method: HttpMethod::$method,
                                path: $path,
                                params: &[$($param),*],
                            };
                            &DESCRIPTOR
                        }
                    )*
                }
            }
        }
    };
}

use ParamKind::{Array, Integer, String as Str};

operations! {
    // ===== Authentication =====
    Ping => "ping", Get "/ping",
        "Test API connectivity and authentication",
        [];

    // ===== Sending =====
    SendEmail => "send_email", Post "/send",
        "Send a single transactional email synchronously (no tracking). Requires html or text.",
        [
            ParamSpec::body("to", Str, "Recipient email address").required(),
            ParamSpec::body("to_name", Str, "Recipient name"),
            ParamSpec::body("subject", Str, "Email subject line").required(),
            ParamSpec::body("html", Str, "HTML content (required unless text is given)"),
            ParamSpec::body("text", Str, "Plain text version"),
            ParamSpec::body("type", Integer, "1=HTML+text (default), 2=HTML only, 3=text only"),
            ParamSpec::body("from_name", Str, "Sender display name"),
            ParamSpec::body("reply_to", Str, "Reply-to email address"),
            ParamSpec::body("server_id", Integer, "Specific server ID"),
            ParamSpec::body("unsubscribe_url", Str, "URL for the List-Unsubscribe header"),
        ];
    SendBatch => "send_batch", Post "/send/batch",
        "Send up to 1000 marketing emails as an async task with full tracking",
        [
            ParamSpec::body("recipients", Array, "Recipients (max 1000), each {email, name?}").required(),
            ParamSpec::body("subject", Str, "Subject; supports %%First Name%% style placeholders").required(),
            ParamSpec::body("html", Str, "HTML content; supports personalisation placeholders").required(),
            ParamSpec::body("text", Str, "Plain text version"),
            ParamSpec::body("preheader", Str, "Preheader / preview text"),
            ParamSpec::body("from_name", Str, "Sender display name"),
            ParamSpec::body("server_id", Integer, "Specific server ID"),
        ];
    SendStatus => "send_status", Get "/send/status",
        "Get the status of a sent email by message ID or send ID",
        [
            ParamSpec::query("message_id", Str, "Message ID returned from send_email"),
            ParamSpec::query("id", Integer, "Send ID returned from send_email"),
        ];

    // ===== Campaigns =====
    ListCampaigns => "list_campaigns", Get "/campaigns",
        "List all email campaigns",
        [
            ParamSpec::query("limit", Integer, "Max results (default 50)"),
            ParamSpec::query("offset", Integer, "Pagination offset"),
        ];
    GetCampaign => "get_campaign", Get "/campaigns/get",
        "Get a specific campaign by ID",
        [ParamSpec::query("id", Integer, "Campaign ID").required()];
    CreateCampaign => "create_campaign", Post "/campaigns/create",
        "Create a new email campaign",
        [
            ParamSpec::body("name", Str, "Campaign name").required(),
            ParamSpec::body("subject", Str, "Email subject line").required(),
            ParamSpec::body("html", Str, "HTML content").required(),
            ParamSpec::body("text", Str, "Plain text version"),
            ParamSpec::body("preheader", Str, "Preheader text"),
            ParamSpec::body("type", Integer, "1=HTML+text (default), 2=HTML only, 3=text only"),
        ];
    UpdateCampaign => "update_campaign", Post "/campaigns/update",
        "Update an existing campaign; only provided fields change",
        [
            ParamSpec::query("id", Integer, "Campaign ID").required(),
            ParamSpec::body("name", Str, "Campaign name"),
            ParamSpec::body("subject", Str, "Email subject line"),
            ParamSpec::body("html", Str, "HTML content"),
            ParamSpec::body("text", Str, "Plain text version"),
            ParamSpec::body("preheader", Str, "Preheader text"),
            ParamSpec::body("type", Integer, "1=HTML+text, 2=HTML only, 3=text only"),
        ];
    DeleteCampaign => "delete_campaign", Delete "/campaigns/delete",
        "Delete a campaign (soft delete)",
        [ParamSpec::query("id", Integer, "Campaign ID").required()];

    // ===== Lists & contacts =====
    ListLists => "list_lists", Get "/lists",
        "List all subscriber lists",
        [];
    CreateList => "create_list", Post "/lists/create",
        "Create a new subscriber list",
        [
            ParamSpec::body("name", Str, "List name").required(),
            ParamSpec::body("type", Integer, "1=email (default), 3=phone"),
        ];
    GetContacts => "get_contacts", Get "/lists/contacts",
        "Get contacts from a list",
        [
            ParamSpec::query("id", Integer, "List ID").required(),
            ParamSpec::query("limit", Integer, "Max results (default 100, max 1000)"),
            ParamSpec::query("offset", Integer, "Pagination offset"),
        ];
    AddContacts => "add_contacts", Post "/lists/contacts/add",
        "Add contacts to a list (max 1000 per request)",
        [
            ParamSpec::query("id", Integer, "List ID").required(),
            ParamSpec::body("contacts", Array, "Contacts: {email, firstName?, lastName?, custom1?, custom2?}").required(),
        ];
    DeleteContacts => "delete_contacts", Delete "/lists/contacts/delete",
        "Remove contacts from a list",
        [
            ParamSpec::query("id", Integer, "List ID").required(),
            ParamSpec::body("emails", Array, "Email addresses to remove").required(),
        ];
    SplitList => "split_list", Post "/lists/split",
        "Split a large list into child lists (lists over 150k contacts must be split before sending)",
        [
            ParamSpec::query("id", Integer, "List ID to split").required(),
            ParamSpec::body("max_size", Integer, "Maximum contacts per split (default 35000, max 150000)"),
        ];

    // ===== Schedules =====
    ListSchedules => "list_schedules", Get "/schedules",
        "List all schedules / sending tasks",
        [ParamSpec::query("status", Str, "Filter: queue, prep, sending, done, paused")];
    CreateSchedule => "create_schedule", Post "/schedules/create",
        "Create a new sending task",
        [
            ParamSpec::body("campaign_id", Integer, "Campaign ID").required(),
            ParamSpec::body("list_id", Integer, "List ID").required(),
            ParamSpec::body("server_id", Integer, "Server ID").required(),
            ParamSpec::body("sender_name", Str, "Sender display name"),
            ParamSpec::body("schedule", Str, "Schedule datetime (YYYY-MM-DD HH:MM:SS)"),
        ];
    PauseSchedule => "pause_schedule", Post "/schedules/pause",
        "Pause an active schedule",
        [ParamSpec::query("id", Integer, "Schedule ID").required()];
    ResumeSchedule => "resume_schedule", Post "/schedules/resume",
        "Resume a paused schedule",
        [ParamSpec::query("id", Integer, "Schedule ID").required()];
    UpdateSchedule => "update_schedule", Put "/schedules/update",
        "Update schedule sender name or datetime (not allowed while sending or done)",
        [
            ParamSpec::query("id", Integer, "Schedule ID").required(),
            ParamSpec::body("sender_name", Str, "New sender display name"),
            ParamSpec::body("schedule", Str, "New datetime (YYYY-MM-DD HH:MM:SS)"),
        ];
    StopSchedule => "stop_schedule", Delete "/schedules/stop",
        "Stop and delete a schedule permanently",
        [ParamSpec::query("id", Integer, "Schedule ID").required()];

    // ===== Servers & domains =====
    ListServers => "list_servers", Get "/servers",
        "List sending servers with status, limits and warmup progress",
        [];
    GetServer => "get_server", Get "/servers/get",
        "Get detailed information about a server",
        [ParamSpec::query("id", Integer, "Server ID").required()];
    VerifyDomain => "verify_domain", Get "/domains/verify",
        "DNS verification of a server's domain (SPF, DKIM, DMARC, MX, PTR, DNSSEC, TLSA)",
        [ParamSpec::query("server_id", Integer, "Server ID").required()];

    // ===== Statistics =====
    StatsOverview => "stats_overview", Get "/stats/overview",
        "Overall sending statistics across all campaigns",
        [];
    StatsCampaign => "stats_campaign", Get "/stats/campaign",
        "Statistics for a specific campaign / task",
        [ParamSpec::query("id", Integer, "Task ID").required()];
    StatsHourly => "stats_hourly", Get "/stats/hourly",
        "Hourly breakdown of opens / clicks for a task",
        [ParamSpec::query("id", Integer, "Task ID").required()];
    StatsDaily => "stats_daily", Get "/stats/daily",
        "Daily breakdown of opens / clicks for a task",
        [ParamSpec::query("id", Integer, "Task ID").required()];
    StatsCountries => "stats_countries", Get "/stats/countries",
        "Geographic distribution of opens / clicks",
        [ParamSpec::query("id", Integer, "Task ID").required()];
    StatsBounces => "stats_bounces", Get "/stats/bounces",
        "Bounce details grouped by reason",
        [ParamSpec::query("id", Integer, "Task ID").required()];
    StatsProviders => "stats_providers", Get "/stats/providers",
        "Statistics by mailbox provider (Gmail, Outlook, ...)",
        [ParamSpec::query("id", Integer, "Task ID").required()];
    GetEvents => "get_events", Get "/stats/events",
        "Detailed events (opens, clicks, bounces, unsubscribes) for a task",
        [
            ParamSpec::query("id", Integer, "Task ID").required(),
            ParamSpec::query("type", Str, "Filter: open, click, bounce, unsubscribe, sent"),
            ParamSpec::query("email", Str, "Filter by email address"),
            ParamSpec::query("limit", Integer, "Max results (default 100, max 1000)"),
            ParamSpec::query("offset", Integer, "Pagination offset"),
        ];

    // ===== Suppressions =====
    CheckSuppression => "check_suppression", Get "/suppressions/check",
        "Check whether an email is suppressed (bounced, unsubscribed or blocked)",
        [ParamSpec::query("email", Str, "Email address to check").required()];

    // ===== Account =====
    GetAccount => "get_account", Get "/account",
        "Get account information",
        [];
    GetUsage => "get_usage", Get "/account/usage",
        "Usage statistics and limits",
        [];
    GetApiKeys => "get_api_keys", Get "/account/api-keys",
        "Get the current API key",
        [];
    RegenerateApiKey => "regenerate_api_key", Post "/account/api-keys/regenerate",
        "Generate a new API key; the current key stops working immediately",
        [];
}

impl Operation {
    /// snake_case name of the operation.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Resolves an operation from its name.
    ///
    /// Accepts the snake_case name (`send_email`), the kebab-case form
    /// (`send-email`) and the MCP tool name (`adsmedia_send_email`).
    pub fn from_name(name: &str) -> Option<Self> {
        let normalised = name.trim().replace('-', "_");
        let bare = normalised
            .strip_prefix(TOOL_PREFIX)
            .unwrap_or(normalised.as_str());
        Self::ALL.iter().copied().find(|op| op.name() == bare)
    }
}

impl FromStr for Operation {
    type Err = AdsMediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| AdsMediaError::validation(format!("unknown operation '{s}'")))
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
