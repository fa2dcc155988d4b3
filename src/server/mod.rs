mod app;
mod guard;
mod state;

pub use app::{run, StartupConfig};
pub use guard::ConnectionGuard;
pub use state::AppState;
