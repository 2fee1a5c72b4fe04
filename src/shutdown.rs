//! # Shutdown-to-cancellation bridge.
//!
//! Termination signals are translated into a cancel of the run's shared
//! [`CancellationToken`]. Sync tasks therefore observe external shutdown and
//! sibling failure as the same signal and need no signal handling of their
//! own; [`RunningGroup::join`](crate::RunningGroup::join) classifies the run
//! once everything has drained.
//!
//! On Unix the bridge listens for `SIGINT`, `SIGTERM` (systemd, Kubernetes),
//! and `SIGQUIT`; elsewhere it falls back to [`tokio::signal::ctrl_c`].

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Spawns a watcher that cancels `token` when a termination signal arrives.
///
/// The watcher lives for the whole run; dropping the handle does not stop it.
pub fn bind_shutdown(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = wait_for_shutdown_signal().await {
            error!(error = %err, "failed to listen for shutdown signals");
            return;
        }
        info!("shutdown signal received, cancelling sync tasks");
        token.cancel();
    })
}

/// Resolves once any termination signal has been delivered.
///
/// Fails only if the signal listeners cannot be registered with the OS.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = interrupt.recv() => debug!("SIGINT received"),
        _ = terminate.recv() => debug!("SIGTERM received"),
        _ = quit.recv() => debug!("SIGQUIT received"),
    }
    Ok(())
}

/// Resolves once any termination signal has been delivered.
///
/// Fails only if the signal listeners cannot be registered with the OS.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
