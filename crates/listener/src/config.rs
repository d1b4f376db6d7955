//! Forwarder configuration.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `HOST` | bind address | `0.0.0.0` |
//! | `PORT` | bind port | `8080` |
//! | `ADSMEDIA_API_KEY` | key used for every forwarded call | taken per request from `x-adsmedia-key` |
//! | `NOTIFICATION_EMAIL` | webhook recipient when the payload names none | none |

use std::env;

use client::config::{env_or_default, API_KEY_VAR};
use client::{ConfigError, FromEnv};
use operations::ApiKey;

pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";
pub const NOTIFICATION_EMAIL_VAR: &str = "NOTIFICATION_EMAIL";

#[derive(Clone, Debug, PartialEq)]
pub struct ListenerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<ApiKey>,
    pub notification_email: Option<String>,
}

impl ListenerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            api_key: None,
            notification_email: None,
        }
    }
}

impl FromEnv for ListenerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = env_or_default(PORT_VAR, "8080")
            .trim()
            .parse::<u16>()
            .map_err(|e| ConfigError::ParseError {
                key: PORT_VAR.to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            host: env_or_default(HOST_VAR, "0.0.0.0"),
            port,
            api_key: env::var(API_KEY_VAR).ok().and_then(ApiKey::new),
            notification_email: env::var(NOTIFICATION_EMAIL_VAR)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                (HOST_VAR, None::<&str>),
                (PORT_VAR, None),
                (API_KEY_VAR, None),
                (NOTIFICATION_EMAIL_VAR, None),
            ],
            || {
                let config = ListenerConfig::from_env().unwrap();
                assert_eq!(config, ListenerConfig::default());
                assert_eq!(config.address(), "0.0.0.0:8080");
            },
        );
    }

    #[test]
    fn test_reads_all_variables() {
        temp_env::with_vars(
            [
                (HOST_VAR, Some("127.0.0.1")),
                (PORT_VAR, Some("3000")),
                (API_KEY_VAR, Some("key-1")),
                (NOTIFICATION_EMAIL_VAR, Some("ops@example.com")),
            ],
            || {
                let config = ListenerConfig::from_env().unwrap();
                assert_eq!(config.address(), "127.0.0.1:3000");
                assert_eq!(config.api_key.unwrap().expose(), "key-1");
                assert_eq!(config.notification_email.as_deref(), Some("ops@example.com"));
            },
        );
    }

    #[test]
    fn test_invalid_port() {
        temp_env::with_vars([(PORT_VAR, Some("http"))], || {
            let err = ListenerConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == PORT_VAR));
        });
    }

    #[test]
    fn test_blank_values_are_absent() {
        temp_env::with_vars(
            [
                (HOST_VAR, None),
                (PORT_VAR, None),
                (API_KEY_VAR, Some(" ")),
                (NOTIFICATION_EMAIL_VAR, Some("")),
            ],
            || {
                let config = ListenerConfig::from_env().unwrap();
                assert!(config.api_key.is_none());
                assert!(config.notification_email.is_none());
            },
        );
    }
}
