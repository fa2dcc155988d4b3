//! Scoped ownership of the live connection.

use crate::mongo::{DatabaseConnection, ShutdownError};

/// Owns a connection and releases it exactly once.
///
/// Call [`ConnectionGuard::release`] on the normal path. If the guard is
/// dropped while still holding an open connection, the release is spawned on
/// the current runtime.
pub struct ConnectionGuard<C: DatabaseConnection + 'static> {
    connection: Option<C>,
}

impl<C: DatabaseConnection + 'static> ConnectionGuard<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection: Some(connection),
        }
    }

    /// Borrow the guarded connection; `None` once released.
    pub fn connection(&self) -> Option<&C> {
        self.connection.as_ref()
    }

    pub async fn release(mut self) -> Result<(), ShutdownError> {
        match self.connection.take() {
            Some(connection) => connection.close().await,
            None => Err(ShutdownError::AlreadyClosed),
        }
    }
}

impl<C: DatabaseConnection + 'static> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        if connection.is_closed() {
            return;
        }

        tracing::warn!("Connection guard dropped without release, closing in background");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = connection.close().await {
                        tracing::warn!(error = %e, "Background connection release failed");
                    }
                });
            }
            Err(_) => {
                tracing::warn!("No runtime available, connection pool dropped without shutdown");
            }
        }
    }
}
