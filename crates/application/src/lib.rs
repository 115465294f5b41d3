//! envscope Application - Workbench, ports and use cases
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external collaborators)
//! - The environment workbench and change propagation
//! - Use case orchestration around the snapshot store
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod propagation;
pub mod use_cases;
pub mod workbench;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    ExecutionContext, FileSystem, FileSystemError, Notifier, SnapshotError, SnapshotRepository,
};
pub use propagation::{Change, ChangePropagator, StateSlice, SubscriptionId};
pub use use_cases::{LoadWorkbench, SaveWorkbench};
pub use workbench::EnvironmentWorkbench;
