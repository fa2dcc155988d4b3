mod settings;
mod telemetry;

pub use settings::{ConfigError, ConnectionDescriptor, DatabaseSettings};
pub use telemetry::{LogFormat, TelemetryConfig};
