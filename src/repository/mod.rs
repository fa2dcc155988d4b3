//! Repositories over the live database connection.

pub mod user;

use thiserror::Error;

use crate::mongo::ConnectionError;

pub use user::{MongoUserRepository, User, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The connection is unavailable
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
}
