//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the environment core and its collaborators.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod execution_context;
mod file_system;
mod notifier;
mod snapshot_repository;

pub use execution_context::ExecutionContext;
pub use file_system::{FileSystem, FileSystemError};
pub use notifier::Notifier;
pub use snapshot_repository::{SnapshotError, SnapshotRepository};
