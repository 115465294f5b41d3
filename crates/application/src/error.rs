//! Application error types

use thiserror::Error;
use envscope_domain::{DomainError, ScopeKey};

use crate::ports::SnapshotError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// No edit session is open for the scope.
    #[error("no edit session open for {0}")]
    NoSession(ScopeKey),

    /// Nothing is active for the scope, so there is nothing to edit.
    #[error("no active environment for {0}")]
    NoActiveEnvironment(ScopeKey),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(#[from] SnapshotError),
}

impl ApplicationError {
    /// Returns true if this is a draft that did not parse.
    #[must_use]
    pub const fn is_invalid_format(&self) -> bool {
        matches!(self, Self::Domain(DomainError::InvalidFormat(_)))
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
