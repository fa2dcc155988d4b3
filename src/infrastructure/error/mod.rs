use thiserror::Error;

use crate::config::ConfigError;
use crate::mongo::{ConnectionError, ShutdownError};
use crate::repository::RepositoryError;
use crate::telemetry::TelemetryError;

/// Top-level error surfaced to the process entry point.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to load environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Shutdown error: {0}")]
    Shutdown(#[from] ShutdownError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl AppError {
    /// Stable code used in log records.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::EnvFile(_) => "ENV_FILE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Connection(_) => "CONNECTION_ERROR",
            AppError::Shutdown(_) => "SHUTDOWN_ERROR",
            AppError::Repository(_) => "REPOSITORY_ERROR",
            AppError::Telemetry(_) => "TELEMETRY_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: AppError = ConfigError::MissingPort.into();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("DATABASE_PORT"));

        let err: AppError = ConnectionError::Cancelled.into();
        assert_eq!(err.code(), "CONNECTION_ERROR");

        let err: AppError = ShutdownError::AlreadyClosed.into();
        assert_eq!(err.code(), "SHUTDOWN_ERROR");
    }
}
