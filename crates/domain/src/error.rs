//! Domain error types

use thiserror::Error;

use crate::environment::{EnvironmentId, ScopeKey};

/// Domain-level errors raised by the environment core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The environment id does not exist in the given scope.
    #[error("environment {id} not found in {scope}")]
    NotFound {
        /// Scope that was searched.
        scope: ScopeKey,
        /// Requested environment id.
        id: EnvironmentId,
    },

    /// Draft text is not a flat JSON object of primitive values.
    #[error("invalid variables format: {0}")]
    InvalidFormat(String),

    /// The request has no owning collection or is not saved.
    #[error("request is not part of a saved collection")]
    MissingContext,

    /// An environment with the same id is already registered in the scope.
    #[error("environment {id} already registered in {scope}")]
    DuplicateEnvironment {
        /// Scope the environment was inserted into.
        scope: ScopeKey,
        /// Conflicting environment id.
        id: EnvironmentId,
    },

    /// The edited environment has no committed baseline to replace.
    #[error("environment {0} cannot be committed because it is not registered")]
    CommitDisallowed(EnvironmentId),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
