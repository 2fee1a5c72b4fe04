//! # Readiness gate: wait for a marker object before starting sync tasks.
//!
//! [`wait_for_marker`] polls storage at a fixed interval until a named marker
//! object appears, or the shared cancellation signal fires. It is a startup
//! barrier, not a backoff policy: there is no retry limit and no timeout.
//!
//! ## Rules
//! - No marker configured ⇒ `Ready` immediately, **zero** storage calls
//! - Object absent ⇒ debug log, sleep one interval, retry
//! - Any other storage error ⇒ error log, same sleep, retry (transient,
//!   never fatal on its own)
//! - Cancellation during the sleep returns `Cancelled` promptly instead of
//!   completing the full interval

use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::storage::Storage;

/// Outcome of the readiness gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The marker object exists (or no marker was configured).
    Ready,
    /// The shared cancellation signal fired while waiting.
    Cancelled,
}

/// Blocks until `marker` is present in `storage`, polling every `interval`.
///
/// An empty or absent marker name deactivates the gate. The wait is
/// unbounded; the only early exit is `token` cancellation, observed during
/// the inter-poll sleep.
pub async fn wait_for_marker(
    storage: &dyn Storage,
    marker: Option<&str>,
    interval: Duration,
    token: &CancellationToken,
) -> Gate {
    let Some(marker) = marker.filter(|m| !m.is_empty()) else {
        return Gate::Ready;
    };

    info!(marker, "waiting for marker file to be present in storage");
    loop {
        match storage.load(marker).await {
            Ok(_) => {
                info!(marker, "marker file found, proceeding");
                return Gate::Ready;
            }
            Err(err) if err.is_not_found() => {
                debug!(marker, "marker file not present yet");
            }
            Err(err) => {
                error!(marker, error = %err, "unable to check storage for marker file");
            }
        }

        tokio::select! {
            _ = time::sleep(interval) => {}
            _ = token.cancelled() => return Gate::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::StorageError;

    /// Storage that replays a scripted sequence of responses and counts calls.
    struct ScriptedStorage {
        script: Mutex<VecDeque<Result<Vec<u8>, StorageError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedStorage {
        fn new(script: Vec<Result<Vec<u8>, StorageError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Storage for ScriptedStorage {
        fn kind(&self) -> &'static str {
            "scripted"
        }

        async fn load(&self, name: &str) -> Result<Vec<u8>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            script
                .pop_front()
                .unwrap_or_else(|| Err(StorageError::not_found(name)))
        }
    }

    #[tokio::test]
    async fn test_no_marker_skips_storage_entirely() {
        let storage = ScriptedStorage::new(vec![]);
        let token = CancellationToken::new();

        let gate = wait_for_marker(&storage, None, Duration::from_millis(10), &token).await;
        assert_eq!(gate, Gate::Ready);

        let gate = wait_for_marker(&storage, Some(""), Duration::from_millis(10), &token).await;
        assert_eq!(gate, Gate::Ready);

        assert_eq!(storage.calls(), 0);
    }

    #[tokio::test]
    async fn test_polls_until_found() {
        let storage = ScriptedStorage::new(vec![
            Err(StorageError::not_found("ready.flag")),
            Err(StorageError::not_found("ready.flag")),
            Ok(Vec::new()),
        ]);
        let token = CancellationToken::new();

        let started = Instant::now();
        let gate = wait_for_marker(
            &storage,
            Some("ready.flag"),
            Duration::from_millis(10),
            &token,
        )
        .await;
        let elapsed = started.elapsed();

        assert_eq!(gate, Gate::Ready);
        assert_eq!(storage.calls(), 3);
        // Two misses means exactly two sleeps before the third poll succeeds.
        assert!(elapsed >= Duration::from_millis(20), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(500), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_transient_backend_error_is_retried() {
        let storage = ScriptedStorage::new(vec![
            Err(StorageError::backend("connection refused")),
            Ok(Vec::new()),
        ]);
        let token = CancellationToken::new();

        let gate = wait_for_marker(
            &storage,
            Some("ready.flag"),
            Duration::from_millis(5),
            &token,
        )
        .await;

        assert_eq!(gate, Gate::Ready);
        assert_eq!(storage.calls(), 2);
    }

    #[tokio::test]
    async fn test_cancellation_mid_sleep_returns_promptly() {
        let storage = ScriptedStorage::new(vec![]);
        let token = CancellationToken::new();

        let cancel = token.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let started = Instant::now();
        let gate = wait_for_marker(&storage, Some("ready.flag"), Duration::from_secs(60), &token)
            .await;

        assert_eq!(gate, Gate::Cancelled);
        // Must not wait out the 60s interval.
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
