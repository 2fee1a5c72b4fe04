//! # Syncer trait: one long-running sync task per data unit.
//!
//! A syncer receives a [`CancellationToken`] and must check it cooperatively
//! at its own I/O suspension points. On observing cancellation it should
//! return [`SyncError::Canceled`] so the coordinator can tell a cancellation
//! echo apart from a genuine failure.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SyncError;

/// Shared handle to a syncer (`Arc<dyn Syncer>`).
pub type SyncerRef = Arc<dyn Syncer>;

/// # Asynchronous, cancelable sync task for one data unit.
///
/// Driven to completion exactly once per run. The coordinator never restarts
/// a syncer; retry is an outer-loop concern.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use syncvisor::{SyncError, Syncer};
///
/// struct ShardSync;
///
/// #[async_trait]
/// impl Syncer for ShardSync {
///     fn unit(&self) -> &str { "shard-a" }
///
///     async fn sync(&self, ctx: CancellationToken) -> Result<(), SyncError> {
///         if ctx.is_cancelled() {
///             return Err(SyncError::Canceled);
///         }
///         // reconcile snapshots...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Syncer: Send + Sync + 'static {
    /// Returns the owning unit's name, attached to every log line.
    fn unit(&self) -> &str;

    /// Runs the sync until completion or cancellation.
    ///
    /// Implementations should observe `ctx` at suspension points and exit
    /// promptly with [`SyncError::Canceled`] once the shared signal fires.
    async fn sync(&self, ctx: CancellationToken) -> Result<(), SyncError>;
}
