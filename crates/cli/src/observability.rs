//! Tracing subscriber and optional OpenTelemetry export.
//!
//! Logs go to stderr so stdout stays free for command output and MCP frames.
//! Setting `OTEL_EXPORTER_OTLP_ENDPOINT` adds an OTLP (gRPC) span exporter.

use clap::ValueEnum;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};
use tracing::warn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const OTLP_ENDPOINT_VAR: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const SERVICE_NAME: &str = "adsmedia";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Keeps the tracer provider alive; flushes pending spans on drop.
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to flush traces: {e}");
            }
        }
    }
}

fn otlp_provider() -> Option<TracerProvider> {
    let endpoint = std::env::var(OTLP_ENDPOINT_VAR).ok()?;
    if endpoint.trim().is_empty() {
        return None;
    }

    match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
    {
        Ok(exporter) => Some(
            TracerProvider::builder()
                .with_batch_exporter(exporter, runtime::Tokio)
                .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
                .build(),
        ),
        Err(e) => {
            eprintln!("OTLP exporter disabled: {e}");
            None
        }
    }
}

/// Installs the global subscriber. Must run inside the tokio runtime when
/// OTLP export is enabled.
pub fn init(format: LogFormat) -> Telemetry {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
    };

    let provider = otlp_provider();
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_err()
    {
        warn!("Tracing already initialised");
    }

    Telemetry { provider }
}
