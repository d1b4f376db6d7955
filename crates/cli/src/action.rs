//! GitHub Action mode.
//!
//! Inputs come from `INPUT_<NAME>` variables as set by the Actions runner
//! (name upper-cased, spaces replaced by `_`; an empty value is absent).
//! Outputs are appended to the file named by `GITHUB_OUTPUT`.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use client::AdsMediaClient;
use operations::{AdsMediaError, ApiKey, SendEmail, SendResult, ServerId, Transport};
use tracing::info;

pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Reads one action input.
pub fn input(name: &str) -> Option<String> {
    let var = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_input(name: &str) -> Result<String, AdsMediaError> {
    input(name).ok_or_else(|| {
        AdsMediaError::validation(format!("Input required and not supplied: {name}"))
    })
}

/// Validated inputs of one action run.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionInputs {
    pub api_key: ApiKey,
    pub email: SendEmail,
}

impl ActionInputs {
    pub fn from_env() -> Result<Self, AdsMediaError> {
        let api_key = ApiKey::new(required_input("api-key")?).ok_or_else(|| {
            AdsMediaError::validation("Input required and not supplied: api-key")
        })?;
        let server_id = input("server-id")
            .map(|raw| {
                raw.parse::<u64>().map(ServerId::new).map_err(|_| {
                    AdsMediaError::validation(format!("Input 'server-id' must be a number, got '{raw}'"))
                })
            })
            .transpose()?;

        let email = SendEmail {
            to: required_input("to")?,
            to_name: input("to-name"),
            subject: required_input("subject")?,
            html: input("html"),
            text: input("text"),
            from_name: input("from-name"),
            reply_to: input("reply-to"),
            server_id,
            ..SendEmail::default()
        };
        Ok(Self { api_key, email })
    }
}

/// Sends the email described by `inputs` through `transport`.
pub async fn send<T: Transport>(
    transport: T,
    inputs: ActionInputs,
) -> Result<SendResult, AdsMediaError> {
    let client = AdsMediaClient::with_transport(transport, inputs.api_key);
    let result = client.send_email(&inputs.email).await?;
    info!(message_id = %result.message_id, send_id = %result.send_id, "Email sent");
    Ok(result)
}

/// `name=value` lines for the action outputs.
pub fn output_lines(result: &SendResult) -> String {
    format!(
        "message-id={}\nsend-id={}\nstatus={}\n",
        result.message_id, result.send_id, result.status
    )
}

/// Appends outputs to `GITHUB_OUTPUT`, or prints them when it is unset.
pub fn write_outputs(result: &SendResult) -> std::io::Result<()> {
    let lines = output_lines(result);
    match env::var_os(OUTPUT_FILE_VAR) {
        Some(path) if !path.is_empty() => append(Path::new(&path), &lines),
        _ => {
            print!("{lines}");
            Ok(())
        }
    }
}

fn append(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(contents.as_bytes())
}

/// Workflow command that marks the step as failed.
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use operations::{ApiRequest, MessageId, RawResponse, SendId};
    use serde_json::json;

    use super::*;

    const ALL_INPUTS: [&str; 9] = [
        "INPUT_API-KEY",
        "INPUT_TO",
        "INPUT_SUBJECT",
        "INPUT_HTML",
        "INPUT_TEXT",
        "INPUT_TO-NAME",
        "INPUT_FROM-NAME",
        "INPUT_REPLY-TO",
        "INPUT_SERVER-ID",
    ];

    fn with_inputs<R>(set: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let vars: Vec<(&str, Option<&str>)> = ALL_INPUTS
            .iter()
            .map(|name| {
                let value = set.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
                (*name, value)
            })
            .collect();
        temp_env::with_vars(vars, f)
    }

    fn receipt() -> SendResult {
        SendResult {
            message_id: MessageId::new("m1").unwrap(),
            send_id: SendId::new(42),
            status: "sent".into(),
            to: None,
            from: None,
            server: None,
        }
    }

    #[test]
    fn test_reads_inputs() {
        with_inputs(
            &[
                ("INPUT_API-KEY", "k"),
                ("INPUT_TO", "a@x.io"),
                ("INPUT_SUBJECT", "Build passed"),
                ("INPUT_TEXT", "All green"),
                ("INPUT_HTML", "  "),
                ("INPUT_SERVER-ID", "5"),
            ],
            || {
                let inputs = ActionInputs::from_env().unwrap();
                assert_eq!(inputs.api_key.expose(), "k");
                assert_eq!(inputs.email.to, "a@x.io");
                assert_eq!(inputs.email.text.as_deref(), Some("All green"));
                assert_eq!(inputs.email.html, None);
                assert_eq!(inputs.email.server_id, Some(ServerId::new(5)));
            },
        );
    }

    #[test]
    fn test_missing_required_input() {
        with_inputs(&[("INPUT_API-KEY", "k"), ("INPUT_TO", "a@x.io")], || {
            let err = ActionInputs::from_env().unwrap_err();
            assert_eq!(err.message(), "Input required and not supplied: subject");
        });
    }

    #[test]
    fn test_non_numeric_server_id() {
        with_inputs(
            &[
                ("INPUT_API-KEY", "k"),
                ("INPUT_TO", "a@x.io"),
                ("INPUT_SUBJECT", "s"),
                ("INPUT_SERVER-ID", "main"),
            ],
            || {
                assert!(ActionInputs::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_outputs_are_appended_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        temp_env::with_var(OUTPUT_FILE_VAR, Some(&path), || {
            write_outputs(&receipt()).unwrap();
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "earlier=1\nmessage-id=m1\nsend-id=42\nstatus=sent\n");
    }

    #[test]
    fn test_error_annotation_escapes_newlines() {
        assert_eq!(error_annotation("bad\nkey 100%"), "::error::bad%0Akey 100%25");
    }

    struct SendOk(Mutex<Option<ApiRequest>>);

    #[async_trait]
    impl Transport for SendOk {
        async fn execute(
            &self,
            _: &ApiKey,
            request: &ApiRequest,
        ) -> operations::Result<RawResponse> {
            *self.0.lock().unwrap() = Some(request.clone());
            Ok(RawResponse::new(
                200,
                json!({ "success": true, "data": { "message_id": "m1", "send_id": 42, "status": "sent" } })
                    .to_string(),
            ))
        }
    }

    #[tokio::test]
    async fn test_send_without_content_fails_before_request() {
        let transport = SendOk(Mutex::new(None));
        let inputs = ActionInputs {
            api_key: ApiKey::new("k").unwrap(),
            email: SendEmail {
                to: "a@x.io".into(),
                subject: "s".into(),
                ..SendEmail::default()
            },
        };
        let err = send(&transport, inputs).await.unwrap_err();
        assert!(matches!(err, AdsMediaError::Validation { .. }));
        assert!(transport.0.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_returns_receipt() {
        let transport = SendOk(Mutex::new(None));
        let inputs = ActionInputs {
            api_key: ApiKey::new("k").unwrap(),
            email: SendEmail::html("a@x.io", "s", "<p>x</p>"),
        };
        let result = send(&transport, inputs).await.unwrap();
        assert_eq!(result, receipt());
        assert_eq!(output_lines(&result), "message-id=m1\nsend-id=42\nstatus=sent\n");
    }
}
