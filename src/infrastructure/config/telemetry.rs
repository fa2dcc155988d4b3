use config::{Config, Environment};
use serde::Deserialize;

use super::ConfigError;

/// Output format of the console log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl TryFrom<String> for LogFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format {value:?}, expected pretty or json")),
        }
    }
}

/// Logging and OpenTelemetry settings.
///
/// Read from `LOG_FORMAT` and the `OTEL_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default, rename = "format")]
    pub log_format: LogFormat,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "authentication-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl TelemetryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("OTEL").try_parsing(true))
            .add_source(Environment::with_prefix("LOG"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}
