//! Error types used by the coordinator and sync tasks.
//!
//! This module defines two main error enums:
//!
//! - [`SetupError`] — fatal construction errors raised before any sync task
//!   is spawned (bad configuration, storage backend unavailable).
//! - [`SyncError`] — errors raised by individual sync task executions.
//!
//! Both types provide `as_label` helpers for logging/metrics. [`SyncError`]
//! additionally distinguishes a cancellation echo from a genuine failure via
//! [`SyncError::is_cancellation`].

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// # Fatal errors raised during startup construction.
///
/// These are pre-condition failures: they abort the run before any sync task
/// is spawned and are never part of the running group's result.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration file could not be parsed as YAML.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Configuration was parsed but failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What exactly is wrong.
        reason: String,
    },

    /// Storage backend could not be initialised.
    #[error("failed to initialise storage backend: {message}")]
    Storage {
        /// Backend-provided detail.
        message: String,
    },

    /// A per-unit syncer could not be constructed.
    #[error("failed to build syncer for unit {unit}: {message}")]
    Syncer {
        /// Name of the unit whose construction failed.
        unit: String,
        /// Factory-provided detail.
        message: String,
    },
}

impl SetupError {
    /// Shorthand for [`SetupError::InvalidConfig`].
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        SetupError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SetupError::ConfigRead { .. } => "setup_config_read",
            SetupError::ConfigParse(_) => "setup_config_parse",
            SetupError::InvalidConfig { .. } => "setup_config_invalid",
            SetupError::Storage { .. } => "setup_storage",
            SetupError::Syncer { .. } => "setup_syncer",
        }
    }
}

/// # Errors produced by sync task execution.
///
/// A sync task terminates with exactly one of these. [`SyncError::Canceled`]
/// is the *cancellation echo*: the task stopped because the shared signal was
/// already cancelled (sibling failure or external shutdown). It is surfaced
/// distinctly so operators can tell "something broke" from "we were asked to
/// stop", and it is never recorded as the group's first failure.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SyncError {
    /// The task's own terminal error.
    #[error("sync failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// A storage operation failed inside the task.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The task observed the shared cancellation signal and stopped.
    #[error("sync cancelled")]
    Canceled,
}

impl SyncError {
    /// Creates a [`SyncError::Failed`] from any displayable error.
    pub fn failed(error: impl Into<String>) -> Self {
        SyncError::Failed {
            error: error.into(),
        }
    }

    /// Returns `true` if this outcome is a cancellation echo rather than a
    /// genuine failure.
    ///
    /// # Example
    /// ```
    /// use syncvisor::SyncError;
    ///
    /// assert!(SyncError::Canceled.is_cancellation());
    /// assert!(!SyncError::failed("boom").is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, SyncError::Canceled)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SyncError::Failed { .. } => "sync_failed",
            SyncError::Storage(_) => "sync_storage",
            SyncError::Canceled => "sync_canceled",
        }
    }
}
