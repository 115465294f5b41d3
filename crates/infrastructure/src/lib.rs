//! envscope Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod persistence;
pub mod serialization;

pub use adapters::{InMemoryExecutionContext, TracingNotifier};
pub use persistence::{
    DEFAULT_SNAPSHOT_FILE, FileSnapshotRepository, SettingsError, SettingsRepository,
    TokioFileSystem,
};
pub use serialization::{
    SerializationError, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
