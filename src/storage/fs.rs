//! Filesystem-directory storage backend.
//!
//! Objects are plain files under a root directory. `ErrorKind::NotFound`
//! maps to [`StorageError::NotFound`]; every other I/O error is a generic
//! backend error and treated as transient by callers.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use super::{Storage, StorageError};
use crate::error::SetupError;

/// Directory-backed object store.
#[derive(Debug)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Opens the backend rooted at `root`.
    ///
    /// The directory must already exist; a missing root is a startup
    /// pre-condition failure, not a transient condition.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SetupError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(SetupError::Storage {
                message: format!("storage root is not a directory: {}", root.display()),
            });
        }
        Ok(Self { root })
    }

    /// Resolves an object name to a path under the root.
    ///
    /// Names must be plain relative paths; absolute names and `..` segments
    /// are rejected as backend errors.
    fn object_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(name);
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if name.is_empty() || !plain {
            return Err(StorageError::backend(format!(
                "invalid object name: {name:?}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl Storage for FsStorage {
    fn kind(&self) -> &'static str {
        "fs"
    }

    async fn load(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::not_found(name)),
            Err(err) => Err(StorageError::backend(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ready.flag"), b"ok").unwrap();

        let storage = FsStorage::open(dir.path()).unwrap();
        assert_eq!(storage.load("ready.flag").await.unwrap(), b"ok");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::open(dir.path()).unwrap();

        let err = storage.load("absent").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_parent_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::open(dir.path()).unwrap();

        let err = storage.load("../outside").await.unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let err = FsStorage::open("/definitely/not/a/dir").unwrap_err();
        assert_eq!(err.as_label(), "setup_storage");
    }
}
