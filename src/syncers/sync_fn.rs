//! # Function-backed syncer (`SyncFn`).
//!
//! [`SyncFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a
//! fresh future per invocation. Shared state, if any, goes through an
//! explicit `Arc<...>` inside the closure.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::syncer::Syncer;
use crate::error::SyncError;

/// Function-backed syncer implementation.
///
/// ## Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use syncvisor::{SyncError, SyncFn, Syncer, SyncerRef};
///
/// let s: SyncerRef = SyncFn::arc("shard-a", |ctx: CancellationToken| async move {
///     if ctx.is_cancelled() {
///         return Err(SyncError::Canceled);
///     }
///     Ok(())
/// });
///
/// assert_eq!(s.unit(), "shard-a");
/// ```
pub struct SyncFn<F> {
    unit: Cow<'static, str>,
    f: F,
}

impl<F> SyncFn<F> {
    /// Creates a new function-backed syncer.
    ///
    /// Prefer [`SyncFn::arc`] when you immediately need a
    /// [`SyncerRef`](crate::SyncerRef).
    pub fn new(unit: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { unit: unit.into(), f }
    }

    /// Creates the syncer and returns it as a shared handle.
    pub fn arc(unit: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(unit, f))
    }
}

#[async_trait]
impl<F, Fut> Syncer for SyncFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SyncError>> + Send + 'static,
{
    fn unit(&self) -> &str {
        &self.unit
    }

    async fn sync(&self, ctx: CancellationToken) -> Result<(), SyncError> {
        (self.f)(ctx).await
    }
}
