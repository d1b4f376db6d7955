//! ADSMedia HTTP forwarder.
//!
//! Thin HTTP surface over the operation registry, for callers that cannot
//! hold the API key themselves (browsers, form builders, third-party
//! webhooks).
//!
//! ## Architectural Layer
//!
//! **Adapter.** Handlers translate HTTP into [`operations::invoke`] calls and
//! back; the transport is injected.
//!
//! ## Routes
//!
//! | Route | Operation |
//! |-------|-----------|
//! | `GET /ping` | `ping` |
//! | `POST /send` | `send_email`, JSON body as parameters |
//! | `POST /send/batch` | `send_batch` |
//! | `GET /check?email=` | `check_suppression` |
//! | `POST /operations/{name}` | any registry operation |
//! | `POST /webhook` | templated `send_email` (see [`templates`]) |
//!
//! Successful calls answer `{"success": true, "data": ...}`. Failures answer
//! `{"success": false, "error": {"code", "message"}}` with the status chosen
//! by [`ListenerError::status`].

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod templates;

pub use config::ListenerConfig;
pub use error::ListenerError;
pub use routes::{router, AppState, API_KEY_HEADER, NOTIFICATION_EMAIL_HEADER};
pub use server::serve;
pub use templates::{RenderedEmail, WebhookTemplate, WebhookTemplates};
