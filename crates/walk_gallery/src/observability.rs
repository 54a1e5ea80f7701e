//! Tracing subscriber setup.

use gallery_error::{ConfigError, GalleryResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[cfg(feature = "observability")]
use opentelemetry::{global, trace::TracerProvider, KeyValue};
#[cfg(feature = "observability")]
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};

/// Configuration for logging and tracing.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name for telemetry attribution
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter used when `RUST_LOG` is unset (e.g., "info", "debug")
    pub log_level: String,
    /// Enable JSON-formatted logs for structured logging
    pub json_logs: bool,
}

impl ObservabilityConfig {
    /// Create a new configuration with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

/// Install the global tracing subscriber.
///
/// Sets up an `EnvFilter` (from `RUST_LOG`, falling back to
/// `config.log_level`) and a text or JSON fmt layer. With the `observability`
/// feature, spans are also exported through OpenTelemetry to stdout.
///
/// # Errors
///
/// Returns a `ConfigError` if the filter is invalid or a subscriber is
/// already installed.
pub fn init_observability(config: &ObservabilityConfig) -> GalleryResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ConfigError::new(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_level(true)
            .boxed()
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);

    #[cfg(feature = "observability")]
    let result = {
        let resource = Resource::builder()
            .with_service_name(config.service_name.clone())
            .with_attributes(vec![KeyValue::new(
                "service.version",
                config.service_version.clone(),
            )])
            .build();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .with_resource(resource)
            .build();
        global::set_tracer_provider(provider.clone());

        let tracer = provider.tracer(config.service_name.clone());
        registry
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()
    };

    #[cfg(not(feature = "observability"))]
    let result = registry.try_init();

    result.map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;
    Ok(())
}
