// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::mongo;

// Domain layer
pub mod repository;

// Application layer
pub mod server;

// Supporting modules
pub mod shutdown;
pub mod telemetry;
