//! # Syncer factory: constructs one sync task per configured unit.
//!
//! The factory is the external-collaborator seam for the actual
//! synchronization engine. The coordinator calls it once per
//! [`UnitConfig`] before spawning anything; a factory error is fatal and
//! aborts the run with no task spawned.

use crate::config::{Config, UnitConfig};
use crate::error::SetupError;
use crate::storage::StorageRef;

use super::syncer::SyncerRef;

/// Builds a [`Syncer`](crate::Syncer) for one data unit.
///
/// Receives the unit's config, the shared storage handle, and the global run
/// configuration. Construction is synchronous and must not start any work.
///
/// Closures with the matching signature implement this trait directly:
///
/// ```
/// use tokio_util::sync::CancellationToken;
/// use syncvisor::{Config, SetupError, SyncFn, SyncerFactory, SyncerRef, StorageRef, UnitConfig};
///
/// fn factory() -> impl SyncerFactory {
///     |unit: &UnitConfig, _storage: StorageRef, _config: &Config| {
///         let unit = unit.name.clone();
///         Ok::<SyncerRef, SetupError>(SyncFn::arc(unit, |_ctx: CancellationToken| async {
///             Ok(())
///         }))
///     }
/// }
/// # let _ = factory();
/// ```
pub trait SyncerFactory: Send + Sync {
    /// Constructs the syncer for `unit`.
    fn build(
        &self,
        unit: &UnitConfig,
        storage: StorageRef,
        config: &Config,
    ) -> Result<SyncerRef, SetupError>;
}

impl<F> SyncerFactory for F
where
    F: Fn(&UnitConfig, StorageRef, &Config) -> Result<SyncerRef, SetupError> + Send + Sync,
{
    fn build(
        &self,
        unit: &UnitConfig,
        storage: StorageRef,
        config: &Config,
    ) -> Result<SyncerRef, SetupError> {
        self(unit, storage, config)
    }
}
