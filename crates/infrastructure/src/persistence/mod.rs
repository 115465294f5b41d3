//! Persistence adapters.

mod file_system;
mod settings_repository;
mod snapshot_repository;

pub use file_system::TokioFileSystem;
pub use settings_repository::{SettingsError, SettingsRepository};
pub use snapshot_repository::{DEFAULT_SNAPSHOT_FILE, FileSnapshotRepository};
