use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::config::DatabaseSettings;
use crate::error::Result;
use crate::mongo::{ConnectionError, DatabaseConnection, MongoConnection};

use super::{AppState, ConnectionGuard};

/// Startup options for the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Load a `.env` file into the process environment before reading settings
    pub local: bool,
    /// Explicit env file; `.env` in the working directory (or a parent) otherwise
    pub env_file: Option<PathBuf>,
    /// Connect, verify and release immediately instead of waiting for shutdown
    pub check: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            local: true,
            env_file: None,
            check: false,
        }
    }
}

impl StartupConfig {
    /// Load the env file into the process environment when running locally.
    pub fn load_environment(&self) -> Result<()> {
        if !self.local {
            return Ok(());
        }

        match &self.env_file {
            Some(path) => dotenvy::from_path(path)?,
            None => {
                dotenvy::dotenv()?;
            }
        }
        Ok(())
    }
}

/// Load settings, open the database connection and hold it until `ctx` is
/// cancelled (or return immediately in check mode). The connection is
/// released exactly once on every path after it was opened.
pub async fn run(startup: &StartupConfig, ctx: CancellationToken) -> Result<()> {
    let settings = DatabaseSettings::from_env()?;
    let descriptor = settings.descriptor();
    tracing::info!(
        uri = %descriptor.masked_uri(),
        database = %descriptor.database_name(),
        "Configuration loaded"
    );

    let connection = MongoConnection::open(&ctx, &descriptor).await?;
    let guard = ConnectionGuard::new(connection);

    let result = serve(startup, &guard, &ctx).await;

    // A failed release is less severe than a startup failure.
    if let Err(e) = guard.release().await {
        tracing::warn!(error = %e, "Failed to release MongoDB connection");
    }

    result
}

async fn serve(
    startup: &StartupConfig,
    guard: &ConnectionGuard<MongoConnection>,
    ctx: &CancellationToken,
) -> Result<()> {
    let connection = guard.connection().ok_or(ConnectionError::Closed)?;
    let _state = AppState::new(connection)?;
    tracing::info!("Connected to MongoDB");

    if startup.check {
        return Ok(());
    }

    ctx.cancelled().await;
    tracing::info!("Shutdown requested");
    Ok(())
}
