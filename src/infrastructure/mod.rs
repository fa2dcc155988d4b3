//! Infrastructure layer modules
//!
//! This module contains shared infrastructure components:
//! - `config`: Database and telemetry settings
//! - `error`: Top-level error type
//! - `mongo`: MongoDB connection pool
pub mod config;
pub mod error;
pub mod mongo;
