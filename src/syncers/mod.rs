//! # Sync task abstractions.
//!
//! This module provides the seam between the coordinator and the per-unit
//! synchronization engine, which is opaque to this crate:
//! - [`Syncer`] - trait for a long-running, cancelable sync task
//! - [`SyncerRef`] - shared reference to a syncer (`Arc<dyn Syncer>`)
//! - [`SyncFn`] - function-backed syncer implementation
//! - [`SyncerFactory`] - builds one syncer per configured unit

mod factory;
mod sync_fn;
mod syncer;

pub use factory::SyncerFactory;
pub use sync_fn::SyncFn;
pub use syncer::{Syncer, SyncerRef};
