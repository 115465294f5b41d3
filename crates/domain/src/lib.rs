//! envscope Domain - Core environment types
//!
//! This crate defines the environment model: scoped environments, active selection,
//! precedence resolution and edit sessions. All types here are pure Rust with no I/O
//! dependencies.

pub mod context;
pub mod environment;
pub mod error;
pub mod id;
pub mod persistence;
pub mod settings;

pub use context::RequestContext;
pub use environment::{
    ActiveEnvironments, ActiveSelectionTracker, CollectionId, DEFAULT_INDENT, EditSession,
    Environment, EnvironmentId, EnvironmentRegistry, ExternalChange, PrecedenceResolver,
    ResolvedVariable, ResolvedVariables, Scope, ScopeKey, VariableMap, VariableValue,
    merge_environments, parse_variables, serialize_variables, variables_equal,
};
pub use error::{DomainError, DomainResult};
pub use id::generate_id;
pub use persistence::{EnvironmentRecord, WorkspaceSnapshot};
pub use settings::{LogLevel, WorkbenchSettings};
