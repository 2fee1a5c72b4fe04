//! # Storage capability.
//!
//! The coordinator consumes blob storage through the minimal [`Storage`]
//! trait: a `load` that yields bytes, a distinguishable not-found condition,
//! or a generic backend error. Nothing in this crate depends on a richer
//! storage API; the tri-state result is the whole contract.
//!
//! ## Contents
//! - [`Storage`] capability trait and [`StorageRef`] shared handle
//! - [`StorageError`] tri-state classification (`NotFound` vs backend error)
//! - [`MemoryStorage`] in-memory backend (tests and demos)
//! - [`FsStorage`] filesystem-directory backend
//! - [`open`] constructor keyed on [`StorageConfig`]

mod fs;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::StorageConfig;
use crate::error::SetupError;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

/// Shared handle to a storage backend (`Arc<dyn Storage>`).
///
/// Owned by the process for its whole lifetime; shared read-mostly by the
/// readiness gate and by every spawned sync task.
pub type StorageRef = Arc<dyn Storage>;

/// Errors returned by storage operations.
///
/// The coordinator depends only on the distinction between "object absent"
/// (expected, benign) and "backend unreachable" (noisy but transient).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StorageError {
    /// The named object does not exist.
    #[error("object not found: {name}")]
    NotFound {
        /// Name of the missing object.
        name: String,
    },

    /// Any other backend failure (I/O, connectivity, permissions).
    #[error("storage backend error: {message}")]
    Backend {
        /// Backend-provided detail.
        message: String,
    },
}

impl StorageError {
    /// Creates a [`StorageError::NotFound`] for `name`.
    pub fn not_found(name: impl Into<String>) -> Self {
        StorageError::NotFound { name: name.into() }
    }

    /// Creates a [`StorageError::Backend`] from any displayable error.
    pub fn backend(error: impl std::fmt::Display) -> Self {
        StorageError::Backend {
            message: error.to_string(),
        }
    }

    /// Returns `true` for the benign "object absent" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// # Blob-storage capability.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// concurrently from every sync task.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Short backend type name for logs and health metadata.
    fn kind(&self) -> &'static str;

    /// Loads the named object, distinguishing absence from backend failure.
    async fn load(&self, name: &str) -> Result<Vec<u8>, StorageError>;
}

/// Constructs the storage backend described by `config`.
///
/// Fatal on error: a missing or unusable backend is a startup pre-condition
/// failure, surfaced before any sync task is spawned.
pub fn open(config: &StorageConfig) -> Result<StorageRef, SetupError> {
    let storage: StorageRef = match config {
        StorageConfig::Memory => Arc::new(MemoryStorage::new()),
        StorageConfig::Fs { root } => Arc::new(FsStorage::open(root)?),
    };
    info!(storage_type = storage.kind(), "storage backend initialised");
    Ok(storage)
}
