//! `adsmedia` command line entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration** from flags, falling back to `ADSMEDIA_*`
//!    environment variables.
//! 2. **Wire observability** with `tracing-subscriber` on stderr and an
//!    optional OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure** (an [`client::HttpTransport`]) and inject it
//!    into the selected surface.
//! 4. **Select the surface**:
//!    - `operations` / `call` / `send`: one-shot invocations printing JSON.
//!    - `action`: GitHub Action mode driven by `INPUT_*` variables.
//!    - `mcp`: MCP tool server on stdio.
//!    - `serve`: HTTP forwarder.
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | configuration or I/O failure |
//! | 2 | validation error |
//! | 3 | API error |
//! | 4 | transport error |
//! | 5 | malformed response |

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client::config::API_KEY_VAR;
use client::{AdsMediaClient, EndpointConfig, FromEnv, HttpTransport};
use listener::ListenerConfig;
use operations::{
    AdsMediaError, ApiKey, ErrorKind, Operation, ParamLocation, SendEmail, ServerId, Transport,
    DEFAULT_BASE_URL,
};
use serde_json::{json, Value};
use tracing::{error, info};

mod action;
mod observability;
mod params;

use observability::LogFormat;

#[derive(Parser)]
#[command(name = "adsmedia", version)]
#[command(about = "Send email and manage campaigns through the ADSMedia API")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// API key
    #[arg(long, global = true, env = "ADSMEDIA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "ADSMEDIA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = "ADSMEDIA_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List every available operation
    Operations {
        /// Print the registry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Invoke any operation by name
    Call {
        /// Operation name, e.g. `send_email` or `get-campaign`
        operation: String,

        /// Parameter as key=value; repeatable
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Parameters as a JSON object; `-p` values override its keys
        #[arg(long, value_name = "OBJECT")]
        json: Option<String>,
    },

    /// Send a single email
    Send(SendArgs),

    /// Run as a GitHub Action step
    Action,

    /// Serve MCP tools on stdio
    Mcp,

    /// Run the HTTP forwarder
    Serve {
        /// Bind address (defaults to HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (defaults to PORT or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args)]
struct SendArgs {
    #[arg(long)]
    to: String,
    #[arg(long)]
    subject: String,
    #[arg(long)]
    html: Option<String>,
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    to_name: Option<String>,
    #[arg(long)]
    from_name: Option<String>,
    #[arg(long)]
    reply_to: Option<String>,
    #[arg(long)]
    server_id: Option<u64>,
}

impl From<SendArgs> for SendEmail {
    fn from(args: SendArgs) -> Self {
        SendEmail {
            to: args.to,
            to_name: args.to_name,
            subject: args.subject,
            html: args.html,
            text: args.text,
            from_name: args.from_name,
            reply_to: args.reply_to,
            server_id: args.server_id.map(ServerId::new),
            ..SendEmail::default()
        }
    }
}

impl GlobalArgs {
    fn endpoint(&self) -> Result<EndpointConfig> {
        let mut endpoint = EndpointConfig::new(&self.base_url)?;
        if let Some(secs) = self.timeout_secs {
            endpoint = endpoint.with_timeout(Duration::from_secs(secs));
        }
        Ok(endpoint)
    }

    fn transport(&self) -> Result<HttpTransport> {
        Ok(HttpTransport::new(&self.endpoint()?)?)
    }

    fn api_key(&self) -> Option<ApiKey> {
        self.api_key.clone().and_then(ApiKey::new)
    }

    fn require_api_key(&self) -> Result<ApiKey> {
        self.api_key()
            .with_context(|| format!("API key required: pass --api-key or set {API_KEY_VAR}"))
    }
}

/// Maps a failure to the process exit code.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AdsMediaError>().map(AdsMediaError::kind) {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::ApiError) => 3,
        Some(ErrorKind::Transport) => 4,
        Some(ErrorKind::MalformedResponse) => 5,
        None => 1,
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_operations(as_json: bool) -> Result<()> {
    if as_json {
        let registry: Vec<Value> = Operation::ALL
            .iter()
            .map(|op| {
                let d = op.descriptor();
                json!({
                    "name": d.name,
                    "tool": d.tool_name(),
                    "method": d.method.as_str(),
                    "path": d.path,
                    "description": d.description,
                    "params": d.params.iter().map(|p| json!({
                        "name": p.name,
                        "type": p.kind.json_type(),
                        "in": match p.location {
                            ParamLocation::Query => "query",
                            ParamLocation::Body => "body",
                        },
                        "required": p.required,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        return print_json(&Value::Array(registry));
    }

    for op in Operation::ALL {
        let d = op.descriptor();
        println!("{:<20} {:<6} {:<30} {}", d.name, d.method.as_str(), d.path, d.description);
    }
    Ok(())
}

async fn run_action(global: &GlobalArgs) -> Result<()> {
    let outcome = async {
        let inputs = action::ActionInputs::from_env()?;
        let transport = global.transport()?;
        let result = action::send(transport, inputs).await?;
        action::write_outputs(&result).context("Failed to write action outputs")?;
        anyhow::Ok(result)
    }
    .await;

    match outcome {
        Ok(result) => {
            println!("Email sent successfully! Message ID: {}", result.message_id);
            Ok(())
        }
        Err(e) => {
            println!("{}", action::error_annotation(&format!("{e:#}")));
            Err(e)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::Operations { json } => list_operations(json),

        Commands::Call {
            operation,
            params,
            json,
        } => {
            let operation: Operation = operation.parse()?;
            let params = params::build_params(operation, json.as_deref(), &params)?;
            let client = AdsMediaClient::with_transport(global.transport()?, global.require_api_key()?);
            print_json(&client.call(operation, &params).await?)
        }

        Commands::Send(args) => {
            let client = AdsMediaClient::with_transport(global.transport()?, global.require_api_key()?);
            let result = client.send_email(&args.into()).await?;
            print_json(&serde_json::to_value(result)?)
        }

        Commands::Action => run_action(&global).await,

        Commands::Mcp => {
            let transport: Arc<dyn Transport> = Arc::new(global.transport()?);
            let handler = mcp::McpHandler::new(transport, global.require_api_key()?);
            mcp::serve_stdio(&handler).await?;
            Ok(())
        }

        Commands::Serve { host, port } => {
            let mut config = ListenerConfig::from_env()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(key) = global.api_key() {
                config.api_key = Some(key);
            }
            let transport: Arc<dyn Transport> = Arc::new(global.transport()?);
            listener::serve(transport, config).await?;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _telemetry = observability::init(cli.global.log_format);
    info!(version = env!("CARGO_PKG_VERSION"), "adsmedia starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let code = |e: AdsMediaError| exit_code(&anyhow::Error::from(e));
        assert_eq!(code(AdsMediaError::validation("x")), 2);
        assert_eq!(
            code(AdsMediaError::Api {
                status: 401,
                code: None,
                message: "Invalid key".into()
            }),
            3
        );
        assert_eq!(code(AdsMediaError::transport("refused")), 4);
        assert_eq!(
            code(AdsMediaError::MalformedResponse {
                status: 200,
                message: "eof".into()
            }),
            5
        );
        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), 1);
    }

    #[test]
    fn test_call_arguments_parse() {
        let cli = Cli::try_parse_from([
            "adsmedia",
            "call",
            "get-campaign",
            "-p",
            "id=5",
            "--api-key",
            "k",
        ])
        .unwrap();
        assert_eq!(cli.global.api_key.as_deref(), Some("k"));
        match cli.command {
            Commands::Call { operation, params, json } => {
                assert_eq!(operation, "get-campaign");
                assert_eq!(params, vec!["id=5".to_string()]);
                assert!(json.is_none());
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn test_send_args_become_payload() {
        let cli = Cli::try_parse_from([
            "adsmedia", "send", "--to", "a@x.io", "--subject", "Hi", "--text", "yo",
            "--server-id", "3",
        ])
        .unwrap();
        let Commands::Send(args) = cli.command else {
            panic!("expected send");
        };
        let email: SendEmail = args.into();
        assert_eq!(email.to, "a@x.io");
        assert_eq!(email.text.as_deref(), Some("yo"));
        assert_eq!(email.server_id, Some(ServerId::new(3)));
        assert_eq!(email.html, None);
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        temp_env::with_var(API_KEY_VAR, None::<&str>, || {
            let cli = Cli::try_parse_from(["adsmedia", "mcp"]).unwrap();
            let err = cli.global.require_api_key().unwrap_err();
            assert_eq!(exit_code(&err), 1);
        });
    }

    #[test]
    fn test_base_url_flag_is_validated() {
        let cli = Cli::try_parse_from(["adsmedia", "operations", "--base-url", "ftp://x"]).unwrap();
        assert!(cli.global.endpoint().is_err());
    }
}
