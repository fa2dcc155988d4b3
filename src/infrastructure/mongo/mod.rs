//! MongoDB persistence module.
//!
//! Provides the pooled connection used by the repositories.

pub mod pool;

pub use pool::{ConnectionError, DatabaseConnection, MongoConnection, PoolLimits, ShutdownError};
