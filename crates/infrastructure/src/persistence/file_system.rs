//! Real file system implementation.

use std::path::Path;

use envscope_application::ports::{FileSystem, FileSystemError};
use tokio::fs;

/// Real file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                FileSystemError::PermissionDenied(path.to_path_buf())
            }
            _ => FileSystemError::Io(e),
        })
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, contents).await.map_err(FileSystemError::Io)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/state.json");
        let fs = TokioFileSystem::new();

        fs.write_file(&path, b"{}").await.unwrap();

        assert!(fs.exists(&path).await);
        assert_eq!(fs.read_file(&path).await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = TokioFileSystem::new().read_file(&path).await.unwrap_err();

        assert!(matches!(err, FileSystemError::NotFound(p) if p == path));
    }
}
