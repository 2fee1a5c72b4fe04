//! # Coordinator: spawn one sync task per unit, fail fast, drain to completion.
//!
//! The [`Coordinator`] owns the run's shared [`CancellationToken`], builds one
//! [`Syncer`](crate::Syncer) per configured unit through a
//! [`SyncerFactory`], spawns them all logically concurrently, and joins them
//! through [`RunningGroup::join`].
//!
//! ## Architecture
//! ```text
//! UnitConfig[0]  UnitConfig[1]  ...  UnitConfig[N-1]
//!      │              │                    │
//!      └──► factory.build(unit, storage, config)      (all built before any spawn;
//!                        │                             factory error = fatal, nothing runs)
//!                        ▼
//!              JoinSet::spawn(syncer.sync(child_token))   one child token per unit
//!                        │
//!                        ▼
//!              RunningGroup::join()
//!                ├─ outcome Ok               → info log
//!                ├─ outcome Canceled (echo)  → warn log, never the first failure
//!                └─ outcome genuine failure  → error log
//!                      └─ first one: record (unit, error), cancel shared token
//!                        │
//!                        ▼  (after EVERY task terminated)
//!              GroupResult::{AllSucceeded, Cancelled, FirstFailure}
//! ```
//!
//! ## Rules
//! - Outcomes are observed in **completion order**, not declaration order;
//!   with near-simultaneous failures the recorded first failure is whichever
//!   was observed first (accepted non-determinism, never a merged error).
//! - Once a genuine failure is recorded, later outcomes cannot overwrite it.
//! - Cancellation echoes are consequences, not root causes: they are never
//!   recorded as the first failure.
//! - `join` never returns while any task is still active, even after the
//!   first failure is recorded. The group drains; tasks are not force-killed.
//! - External shutdown and sibling failure cancel the **same** token and are
//!   indistinguishable to a task.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{SetupError, SyncError};
use crate::storage::StorageRef;
use crate::syncers::SyncerFactory;

/// Final state of a coordinated run.
#[derive(Debug)]
pub enum GroupResult {
    /// Every unit's outcome was success, regardless of the token's state at
    /// the end of the drain.
    AllSucceeded,
    /// No genuine failure, but at least one unit stopped early on the shared
    /// cancellation signal instead of finishing on its own.
    Cancelled,
    /// The first genuine failure observed, with the owning unit's name.
    FirstFailure {
        /// Unit whose task produced the recorded failure.
        unit: String,
        /// The task's terminal error.
        error: SyncError,
    },
}

impl GroupResult {
    /// `true` unless a genuine failure was recorded.
    ///
    /// A cancelled run is clean: "asked to stop" is not "broke".
    pub fn is_clean(&self) -> bool {
        !matches!(self, GroupResult::FirstFailure { .. })
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            GroupResult::AllSucceeded => "group_all_succeeded",
            GroupResult::Cancelled => "group_cancelled",
            GroupResult::FirstFailure { .. } => "group_first_failure",
        }
    }
}

/// Coordinates the per-unit sync tasks of one run.
///
/// Created once per run; the shared cancellation token lives and dies with
/// it. External shutdown wiring clones the token via
/// [`Coordinator::cancellation_token`] and cancels it.
pub struct Coordinator {
    storage: StorageRef,
    config: Arc<Config>,
    token: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator with a fresh cancellation token.
    pub fn new(storage: StorageRef, config: Arc<Config>) -> Self {
        Self {
            storage,
            config,
            token: CancellationToken::new(),
        }
    }

    /// Returns a clone of the shared cancellation token.
    ///
    /// Cancel it to request the whole group to stop (used by the readiness
    /// gate and the OS-signal shutdown bridge).
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Builds and spawns one sync task per configured unit.
    ///
    /// All syncers are constructed **before** any is spawned, so a factory
    /// error aborts the run with zero tasks running. Each spawned task gets a
    /// child of the shared token.
    pub fn start(&self, factory: &dyn SyncerFactory) -> Result<RunningGroup, SetupError> {
        let mut syncers = Vec::with_capacity(self.config.units.len());
        for unit in &self.config.units {
            let syncer = factory.build(unit, Arc::clone(&self.storage), &self.config)?;
            syncers.push(syncer);
        }

        let mut set = JoinSet::new();
        let mut names = HashMap::with_capacity(syncers.len());
        for syncer in syncers {
            let unit = syncer.unit().to_string();
            let child = self.token.child_token();
            let handle = set.spawn(async move { syncer.sync(child).await });
            names.insert(handle.id(), unit);
        }

        debug!(units = names.len(), "sync tasks spawned");
        Ok(RunningGroup {
            set,
            names,
            token: self.token.clone(),
        })
    }
}

/// A spawned group of sync tasks, joined exactly once.
///
/// Produced by [`Coordinator::start`]; consumed by [`RunningGroup::join`].
#[derive(Debug)]
pub struct RunningGroup {
    set: JoinSet<Result<(), SyncError>>,
    names: HashMap<tokio::task::Id, String>,
    token: CancellationToken,
}

impl RunningGroup {
    /// Number of tasks in the group.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when the group has no tasks.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Waits for **every** task to terminate and classifies the outcomes.
    ///
    /// The first genuine failure cancels the shared token; the join keeps
    /// draining until the set is empty. A panicking task counts as a genuine
    /// failure of its unit.
    pub async fn join(mut self) -> GroupResult {
        let mut first_failure: Option<(String, SyncError)> = None;
        let mut cancellation_seen = false;

        while let Some(joined) = self.set.join_next_with_id().await {
            let (unit, outcome) = match joined {
                Ok((id, outcome)) => (self.unit_name(&id), outcome),
                Err(join_err) => {
                    let unit = self.unit_name(&join_err.id());
                    (unit, Err(SyncError::failed(join_err.to_string())))
                }
            };

            match outcome {
                Ok(()) => {
                    info!(unit = %unit, "sync finished");
                }
                Err(err) if err.is_cancellation() => {
                    warn!(unit = %unit, "sync cancelled");
                    cancellation_seen = true;
                }
                Err(err) => {
                    error!(unit = %unit, error = %err, "sync failed");
                    if first_failure.is_none() {
                        self.token.cancel();
                        first_failure = Some((unit, err));
                    }
                }
            }
        }

        match first_failure {
            Some((unit, error)) => GroupResult::FirstFailure { unit, error },
            None if cancellation_seen => GroupResult::Cancelled,
            None => GroupResult::AllSucceeded,
        }
    }

    fn unit_name(&self, id: &tokio::task::Id) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }
}
