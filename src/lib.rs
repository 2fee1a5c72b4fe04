//! # syncvisor
//!
//! **Syncvisor** is a fail-fast coordinator for groups of long-running
//! synchronization tasks that share a blob-storage backend.
//!
//! It gates startup on an external readiness marker, launches one
//! independent sync task per configured data unit, propagates the first
//! genuine failure across the group through a shared cancellation signal,
//! and exposes aggregate liveness over an HTTP endpoint. The per-unit sync
//! engine itself is an external collaborator, plugged in through the
//! [`SyncerFactory`] seam.
//!
//! ## Architecture
//! ```text
//!   Config (YAML, loaded once)          storage::open()
//!        │                                    │
//!        ▼                                    ▼
//!   ┌────────────────────────────────────────────────────────────┐
//!   │  Readiness Gate                                            │
//!   │  wait_for_marker(storage, marker, interval, token)         │
//!   │    absent → debug, sleep, retry   unreachable → error,     │
//!   │    retry   cancelled mid-sleep → Cancelled (prompt)        │
//!   └──────────────────────────┬─────────────────────────────────┘
//!                              ▼
//!   ┌────────────────────────────────────────────────────────────┐
//!   │  Coordinator (one shared CancellationToken)                │
//!   │    UnitConfig ──► SyncerFactory::build ──► JoinSet::spawn  │
//!   │    first genuine failure ──► token.cancel()                │
//!   │    join drains EVERY task, then classifies                 │
//!   └──────────────────────────┬─────────────────────────────────┘
//!                              ▼
//!   ┌────────────────────────────────────────────────────────────┐
//!   │  Liveness Publisher                                        │
//!   │    Registry{version, hostname, storage}                    │
//!   │    health::activate ──► axum /healthz (unless only_once)   │
//!   └──────────────────────────┬─────────────────────────────────┘
//!                              ▼
//!              GroupResult::{AllSucceeded, Cancelled, FirstFailure}
//!                   (caller maps this to exit code / fatal log)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use syncvisor::{
//!     Config, Coordinator, GroupResult, SetupError, StorageRef, SyncFn, SyncerRef, UnitConfig,
//!     health, storage,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), SetupError> {
//!     let mut config = Config::default();
//!     config.only_once = true;
//!     config.units = vec![UnitConfig::named("shard-a")];
//!     let config = Arc::new(config);
//!
//!     let storage = storage::open(&config.storage)?;
//!     let registry = Arc::new(health::Registry::new());
//!     health::register_process_meta(&registry);
//!
//!     // The factory seam: plug in the real sync engine here.
//!     let factory = |unit: &UnitConfig, _storage: StorageRef, _config: &Config| {
//!         Ok::<SyncerRef, SetupError>(SyncFn::arc(unit.name.clone(), |_ctx: CancellationToken| {
//!             async { Ok(()) }
//!         }))
//!     };
//!
//!     let coordinator = Coordinator::new(storage, Arc::clone(&config));
//!     let group = coordinator.start(&factory)?;
//!     let _endpoint = health::activate(Arc::clone(&registry), &config); // None: only_once
//!
//!     match group.join().await {
//!         GroupResult::FirstFailure { unit, error } => {
//!             eprintln!("sync failed for {unit}: {error}");
//!             std::process::exit(1)
//!         }
//!         _ => Ok(()),
//!     }
//! }
//! ```

mod config;
mod coordinator;
mod error;
mod gate;
mod shutdown;
mod syncers;

pub mod health;
pub mod storage;

// ---- Public re-exports ----

pub use config::{Config, StorageConfig, UnitConfig};
pub use coordinator::{Coordinator, GroupResult, RunningGroup};
pub use error::{SetupError, SyncError};
pub use gate::{Gate, wait_for_marker};
pub use health::{Registry, VERSION};
pub use shutdown::{bind_shutdown, wait_for_shutdown_signal};
pub use storage::{FsStorage, MemoryStorage, Storage, StorageError, StorageRef};
pub use syncers::{SyncFn, Syncer, SyncerFactory, SyncerRef};
