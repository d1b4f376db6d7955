//! ADSMedia HTTP client infrastructure adapter.
//!
//! Implements the [`operations::Transport`] port over `reqwest` and wraps it in
//! a typed SDK ([`AdsMediaClient`]).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport and environment configuration live here.
//! Request mapping and envelope normalisation stay in [`operations`]; this crate
//! never re-implements them.
//!
//! ## Behaviour
//!
//! One call is one HTTP request. Retry, rate limiting and caching are left to
//! callers.

pub mod config;
pub mod http;
pub mod sdk;

pub use config::{ClientConfig, ConfigError, EndpointConfig, FromEnv};
pub use http::HttpTransport;
pub use sdk::{AdsMediaClient, EventFilter, StatsReport};
