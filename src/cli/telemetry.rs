//! Log output plus optional OTLP span export for the binary.

use anyhow::Result;
use once_cell::sync::OnceCell;
use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use std::{env::var, time::Duration};
use tracing::{debug, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use ulid::Ulid;

const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

// gRPC endpoints without a scheme are assumed to be TLS.
fn normalize_endpoint(endpoint: String) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint
    } else {
        format!("https://{}", endpoint.trim_end_matches('/'))
    }
}

fn init_provider(endpoint: String) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(normalize_endpoint(endpoint))
        .with_timeout(Duration::from_secs(3))
        .build()?;

    let instance_id = var("OTEL_SERVICE_INSTANCE_ID").unwrap_or_else(|_| Ulid::new().to_string());
    let resource = Resource::builder_empty()
        .with_attributes([
            KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("service.instance.id", instance_id),
        ])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    if TRACER_PROVIDER.set(provider.clone()).is_err() {
        warn!("tracer provider already initialized");
    }
    global::set_tracer_provider(provider.clone());

    Ok(provider)
}

fn filter(verbosity_level: Level) -> Result<EnvFilter> {
    Ok(EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?)
        .add_directive("opentelemetry_sdk=warn".parse()?))
}

/// Installs the global subscriber. Spans are exported over OTLP/gRPC only
/// when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
///
/// # Errors
///
/// Returns an error if the exporter cannot be built or a global subscriber is
/// already set.
pub fn init(verbosity_level: Option<Level>) -> Result<()> {
    let otel_layer = match var(OTLP_ENDPOINT_ENV) {
        Ok(endpoint) => {
            let provider = init_provider(endpoint)?;
            Some(tracing_opentelemetry::layer().with_tracer(provider.tracer(env!("CARGO_PKG_NAME"))))
        }
        Err(_) => None,
    };

    let subscriber = Registry::default()
        .with(fmt::layer().with_target(false).pretty())
        .with(otel_layer)
        .with(filter(verbosity_level.unwrap_or(Level::ERROR))?);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Flushes pending spans. Does nothing when export was never enabled.
pub fn shutdown_tracer() {
    let Some(provider) = TRACER_PROVIDER.get() else {
        return;
    };
    debug!("shutting down tracer provider");
    match provider.shutdown() {
        Ok(()) => debug!("tracer provider shutdown complete"),
        Err(err) => warn!(error = %err, "tracer provider shutdown failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_without_scheme_defaults_to_https() {
        assert_eq!(
            normalize_endpoint("http://localhost:4317".to_string()),
            "http://localhost:4317"
        );
        assert_eq!(
            normalize_endpoint("localhost:4317".to_string()),
            "https://localhost:4317"
        );
        assert_eq!(
            normalize_endpoint("collector.example.com:4317/".to_string()),
            "https://collector.example.com:4317"
        );
    }

    #[test]
    fn filter_accepts_every_level() {
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE] {
            assert!(filter(level).is_ok());
        }
    }

    #[test]
    fn shutdown_without_provider_is_a_noop() {
        shutdown_tracer();
    }
}
