//! Snapshot repository port
//!
//! Defines the interface to the external store that owns environment persistence.

use async_trait::async_trait;

use envscope_domain::WorkspaceSnapshot;

/// Errors that can occur while loading or saving a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot content is inconsistent.
    #[error("Invalid snapshot: {0}")]
    Invalid(String),
}

/// Repository trait for the environment snapshot.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Loads the snapshot.
    ///
    /// A store with nothing saved yet returns an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or parsed.
    async fn load(&self) -> Result<WorkspaceSnapshot, SnapshotError>;

    /// Saves the snapshot, replacing what was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn save(&self, snapshot: &WorkspaceSnapshot) -> Result<(), SnapshotError>;
}
