//! Observability configuration

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Receives one formatted line per log event. Runs on the logging thread, so
/// it must not block.
pub type LogSink = Arc<dyn Fn(String) + Send + Sync>;

const DEFAULT_SERVICE_NAME: &str = "dryrun";

#[derive(Clone)]
pub struct ObservabilityConfig {
    pub service_name: String,
    pub service_version: Option<String>,
    /// OTLP gRPC endpoint, e.g. `http://localhost:4317`.
    pub otlp_endpoint: Option<String>,
    /// Write formatted logs to stderr.
    pub enable_console: bool,
    /// `EnvFilter` directive string. Falls back to `RUST_LOG`, then `info`.
    pub log_level: Option<String>,
    pub resource_attributes: Vec<(String, String)>,
    pub log_sink: Option<LogSink>,
}

#[derive(Serialize, Deserialize)]
struct ConfigRepr {
    #[serde(default = "default_service_name")]
    service_name: String,
    #[serde(default)]
    service_version: Option<String>,
    #[serde(default)]
    otlp_endpoint: Option<String>,
    #[serde(default = "default_console")]
    enable_console: bool,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    resource_attributes: Vec<(String, String)>,
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_console() -> bool {
    true
}

// The sink is a closure and never leaves the process.
impl Serialize for ObservabilityConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ConfigRepr {
            service_name: self.service_name.clone(),
            service_version: self.service_version.clone(),
            otlp_endpoint: self.otlp_endpoint.clone(),
            enable_console: self.enable_console,
            log_level: self.log_level.clone(),
            resource_attributes: self.resource_attributes.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ObservabilityConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = ConfigRepr::deserialize(deserializer)?;
        Ok(ObservabilityConfig {
            service_name: repr.service_name,
            service_version: repr.service_version,
            otlp_endpoint: repr.otlp_endpoint,
            enable_console: repr.enable_console,
            log_level: repr.log_level,
            resource_attributes: repr.resource_attributes,
            log_sink: None,
        })
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: None,
            otlp_endpoint: None,
            enable_console: true,
            log_level: None,
            resource_attributes: Vec::new(),
            log_sink: None,
        }
    }
}

impl std::fmt::Debug for ObservabilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservabilityConfig")
            .field("service_name", &self.service_name)
            .field("service_version", &self.service_version)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .field("enable_console", &self.enable_console)
            .field("log_level", &self.log_level)
            .field("resource_attributes", &self.resource_attributes)
            .field("log_sink", &self.log_sink.as_ref().map(|_| "LogSink"))
            .finish()
    }
}

impl ObservabilityConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_console(mut self, enable: bool) -> Self {
        self.enable_console = enable;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn with_resource_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.resource_attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Reads `OTEL_SERVICE_NAME`, `OTEL_SERVICE_VERSION`,
    /// `OTEL_EXPORTER_OTLP_ENDPOINT` and the first of `DRYRUN_LOG`,
    /// `OTEL_LOG_LEVEL`, `RUST_LOG`. Blank values count as unset.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            service_name: var("OTEL_SERVICE_NAME").unwrap_or_else(default_service_name),
            service_version: var("OTEL_SERVICE_VERSION"),
            // OTLP stays off unless asked for; a missing collector would spam connection errors.
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
            enable_console: true,
            log_level: var("DRYRUN_LOG")
                .or_else(|| var("OTEL_LOG_LEVEL"))
                .or_else(|| var("RUST_LOG")),
            resource_attributes: Vec::new(),
            log_sink: None,
        }
    }
}
