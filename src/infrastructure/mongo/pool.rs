//! MongoDB connection pool with a liveness check on open.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::ConnectionDescriptor;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_CONN_IDLE_TIME: Duration = Duration::from_secs(3 * 60);
const MIN_POOL_SIZE: u32 = 20;
const MAX_POOL_SIZE: u32 = 300;

/// Errors that can occur while opening or using the connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to initiate MongoDB connection: {0}")]
    Initiate(#[source] mongodb::error::Error),

    #[error("MongoDB liveness check failed: {0}")]
    LivenessCheck(#[source] mongodb::error::Error),

    #[error("Connection attempt was cancelled")]
    Cancelled,

    #[error("Connection has already been released")]
    Closed,
}

/// Errors that can occur while releasing the connection.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("Connection has already been released")]
    AlreadyClosed,
}

/// Pool and timeout settings applied to every connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolLimits {
    /// Timeout for establishing each socket
    pub connect_timeout: Duration,
    /// Idle pooled connections older than this are closed
    pub max_idle_time: Duration,
    pub min_pool_size: u32,
    pub max_pool_size: u32,
    /// Falls back to the driver default when `None`
    pub server_selection_timeout: Option<Duration>,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            max_idle_time: MAX_CONN_IDLE_TIME,
            min_pool_size: MIN_POOL_SIZE,
            max_pool_size: MAX_POOL_SIZE,
            server_selection_timeout: None,
        }
    }
}

/// A live database connection that can be opened and released.
#[async_trait]
pub trait DatabaseConnection: Send + Sync + Sized {
    /// Open a pooled connection and verify the database is reachable.
    async fn open(
        ctx: &CancellationToken,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Self, ConnectionError>;

    /// Round-trip to the database.
    async fn ping(&self) -> Result<(), ConnectionError>;

    /// Release the underlying pool. Succeeds at most once.
    async fn close(&self) -> Result<(), ShutdownError>;

    fn is_closed(&self) -> bool;
}

/// Shared handle to a pooled MongoDB client.
///
/// Clones share the same pool and the same released state.
#[derive(Clone)]
pub struct MongoConnection {
    client: Client,
    database: Database,
    closed: Arc<AtomicBool>,
}

impl MongoConnection {
    /// Open a connection with explicit pool limits.
    #[tracing::instrument(
        name = "mongo_open",
        skip_all,
        fields(database = %descriptor.database_name())
    )]
    pub async fn open_with_limits(
        ctx: &CancellationToken,
        descriptor: &ConnectionDescriptor,
        limits: &PoolLimits,
    ) -> Result<Self, ConnectionError> {
        let client = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(ConnectionError::Cancelled),
            result = build_client(descriptor, limits) => result?,
        };

        let connection = Self::from_client(client, descriptor.database_name());

        let ping = tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(ConnectionError::Cancelled),
            result = connection.ping() => result,
        };

        if let Err(e) = ping {
            tracing::warn!(error = %e, "Discarding MongoDB pool after failed open");
            connection.client.shutdown().await;
            return Err(e);
        }

        tracing::info!(
            min_pool_size = limits.min_pool_size,
            max_pool_size = limits.max_pool_size,
            "MongoDB connection pool created"
        );

        Ok(connection)
    }

    pub(crate) fn from_client(client: Client, database_name: &str) -> Self {
        let database = client.database(database_name);
        Self {
            client,
            database,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the target database, unless the connection was released.
    pub fn database(&self) -> Result<Database, ConnectionError> {
        self.ensure_open()?;
        Ok(self.database.clone())
    }

    /// Get the underlying client, unless the connection was released.
    pub fn client(&self) -> Result<&Client, ConnectionError> {
        self.ensure_open()?;
        Ok(&self.client)
    }

    fn ensure_open(&self) -> Result<(), ConnectionError> {
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }
        Ok(())
    }
}

async fn build_client(
    descriptor: &ConnectionDescriptor,
    limits: &PoolLimits,
) -> Result<Client, ConnectionError> {
    let mut options = ClientOptions::parse(descriptor.connection_uri())
        .await
        .map_err(ConnectionError::Initiate)?;

    options.connect_timeout = Some(limits.connect_timeout);
    options.max_idle_time = Some(limits.max_idle_time);
    options.min_pool_size = Some(limits.min_pool_size);
    options.max_pool_size = Some(limits.max_pool_size);
    if let Some(timeout) = limits.server_selection_timeout {
        options.server_selection_timeout = Some(timeout);
    }

    Client::with_options(options).map_err(ConnectionError::Initiate)
}

#[async_trait]
impl DatabaseConnection for MongoConnection {
    async fn open(
        ctx: &CancellationToken,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Self, ConnectionError> {
        Self::open_with_limits(ctx, descriptor, &PoolLimits::default()).await
    }

    async fn ping(&self) -> Result<(), ConnectionError> {
        self.ensure_open()?;
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(ConnectionError::LivenessCheck)?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ShutdownError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(ShutdownError::AlreadyClosed);
        }

        self.client.clone().shutdown().await;
        tracing::info!("MongoDB connection pool closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
