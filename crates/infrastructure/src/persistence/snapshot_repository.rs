//! File-based snapshot repository.
//!
//! The whole environment state of a workspace lives in one JSON file:
//! ```text
//! {
//!   "active": { "workspace": "<id>", "collections": { "<collection>": "<id>" } },
//!   "collections": { "<collection>": [ { "id", "name", "variables" } ] },
//!   "schema_version": 1,
//!   "workspace": [ { "id", "name", "variables" } ]
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use envscope_application::ports::{
    FileSystem, FileSystemError, SnapshotError, SnapshotRepository,
};
use envscope_domain::WorkspaceSnapshot;
use envscope_domain::persistence::CURRENT_SCHEMA_VERSION;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// File name of the snapshot inside a workspace directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = "environments.json";

/// Converts `FileSystemError` to `std::io::Error` for `SnapshotError`.
fn to_io_error(e: FileSystemError) -> std::io::Error {
    match e {
        FileSystemError::Io(io_err) => io_err,
        FileSystemError::NotFound(path) => {
            std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string())
        }
        FileSystemError::PermissionDenied(path) => std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            path.display().to_string(),
        ),
    }
}

/// Snapshot repository backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotRepository<F> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> FileSnapshotRepository<F> {
    /// Creates a repository for the given state file.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    /// Returns the state file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<F: FileSystem + Sync> SnapshotRepository for FileSnapshotRepository<F> {
    async fn load(&self) -> Result<WorkspaceSnapshot, SnapshotError> {
        if !self.fs.exists(&self.path).await {
            debug!(path = %self.path.display(), "No snapshot yet, starting empty");
            return Ok(WorkspaceSnapshot::default());
        }

        let content = self
            .fs
            .read_file(&self.path)
            .await
            .map_err(|e| SnapshotError::Io(to_io_error(e)))?;

        let snapshot: WorkspaceSnapshot = from_json_bytes(&content)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        if snapshot.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(SnapshotError::Invalid(format!(
                "schema version {} is newer than supported version {CURRENT_SCHEMA_VERSION}",
                snapshot.schema_version
            )));
        }

        Ok(snapshot)
    }

    async fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<(), SnapshotError> {
        let content = to_json_stable_bytes(snapshot)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        self.fs
            .write_file(&self.path, &content)
            .await
            .map_err(|e| SnapshotError::Io(to_io_error(e)))?;

        debug!(path = %self.path.display(), bytes = content.len(), "Snapshot written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::persistence::TokioFileSystem;
    use envscope_domain::{CollectionId, EnvironmentId, EnvironmentRecord, VariableValue};
    use pretty_assertions::assert_eq;

    fn repository(dir: &tempfile::TempDir) -> FileSnapshotRepository<TokioFileSystem> {
        FileSnapshotRepository::new(TokioFileSystem::new(), dir.path().join(DEFAULT_SNAPSHOT_FILE))
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = repository(&dir).load().await.unwrap();
        assert_eq!(snapshot, WorkspaceSnapshot::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        let mut snapshot = WorkspaceSnapshot::default();
        snapshot.collections.insert(
            CollectionId::new("c1"),
            vec![EnvironmentRecord {
                id: EnvironmentId::new("c1-dev"),
                name: "Dev".to_string(),
                variables: [
                    ("token".to_string(), VariableValue::from("t1")),
                    ("retries".to_string(), VariableValue::from(3_i64)),
                ]
                .into_iter()
                .collect(),
            }],
        );
        snapshot
            .active
            .collections
            .insert(CollectionId::new("c1"), EnvironmentId::new("c1-dev"));

        repo.save(&snapshot).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn test_saved_file_is_stable_json() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);

        repo.save(&WorkspaceSnapshot::default()).await.unwrap();

        let written = tokio::fs::read_to_string(repo.path()).await.unwrap();
        assert_eq!(
            written,
            "{\n  \"active\": {},\n  \"collections\": {},\n  \"schema_version\": 1,\n  \"workspace\": []\n}\n"
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        tokio::fs::write(repo.path(), b"{ not json").await.unwrap();

        let err = repo.load().await.unwrap_err();

        assert!(matches!(err, SnapshotError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_newer_schema_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repository(&dir);
        tokio::fs::write(repo.path(), br#"{"schema_version": 99}"#)
            .await
            .unwrap();

        let err = repo.load().await.unwrap_err();

        assert!(matches!(err, SnapshotError::Invalid(_)));
    }
}
