//! Shutdown signal handling.
//!
//! A single [`CancellationToken`] is the process-wide shutdown context. It is
//! cancelled by Ctrl+C or SIGTERM and observed by the bootstrap, including an
//! in-progress connection attempt.

use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Wait for Ctrl+C or SIGTERM, then cancel `token`.
///
/// Returns early without cancelling if the token is cancelled elsewhere.
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating shutdown");
        }
        _ = token.cancelled() => return,
    }

    token.cancel();
}
