//! src/telemetry.rs
use crate::configuration::TelemetrySettings;
use opentelemetry::trace::TracerProvider as _;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber. The returned provider, present only when
/// OTLP export is enabled, must be shut down before exit to flush spans.
pub fn init_tracing(
    service_name: &'static str,
    settings: &TelemetrySettings,
) -> anyhow::Result<Option<opentelemetry_sdk::trace::SdkTracerProvider>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&settings.log_level))?;

    let tracer_provider = if settings.otlp_enabled {
        let provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_resource(
                opentelemetry_sdk::Resource::builder()
                    .with_service_name(service_name)
                    .build(),
            )
            .with_batch_exporter(
                opentelemetry_otlp::SpanExporter::builder()
                    .with_tonic()
                    .build()?,
            )
            .build();
        opentelemetry::global::set_tracer_provider(provider.clone());
        Some(provider)
    } else {
        None
    };
    let otel_layer = tracer_provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_target(false),
        )
        .with(otel_layer)
        .try_init()?;

    Ok(tracer_provider)
}
