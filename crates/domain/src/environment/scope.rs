//! Scope and identifier types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// Identifier of an environment. Immutable once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentId(String);

impl EnvironmentId {
    /// Wraps an existing id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh time-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self(generate_id())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EnvironmentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EnvironmentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of a saved request collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(String);

impl CollectionId {
    /// Wraps an existing id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CollectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CollectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The two environment scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Workspace-wide environments, always eligible.
    #[default]
    Workspace,
    /// Environments tied to one saved collection.
    Collection,
}

impl Scope {
    /// Returns a human-readable name for the scope.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Workspace => "Workspace",
            Self::Collection => "Collection",
        }
    }
}

/// A scope plus, for collection scope, the owning collection id.
///
/// Every registry partition, active selection and edit session is keyed by this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// The workspace scope.
    Workspace,
    /// The scope of one collection.
    Collection(CollectionId),
}

impl ScopeKey {
    /// Shorthand for a collection scope key.
    #[must_use]
    pub fn collection(id: impl Into<CollectionId>) -> Self {
        Self::Collection(id.into())
    }

    /// Returns the scope kind.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        match self {
            Self::Workspace => Scope::Workspace,
            Self::Collection(_) => Scope::Collection,
        }
    }

    /// Returns the collection id for collection keys.
    #[must_use]
    pub const fn collection_id(&self) -> Option<&CollectionId> {
        match self {
            Self::Workspace => None,
            Self::Collection(id) => Some(id),
        }
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Workspace => f.write_str("workspace"),
            Self::Collection(id) => write!(f, "collection {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_key_scope() {
        assert_eq!(ScopeKey::Workspace.scope(), Scope::Workspace);
        assert_eq!(ScopeKey::collection("c1").scope(), Scope::Collection);
        assert_eq!(
            ScopeKey::collection("c1").collection_id(),
            Some(&CollectionId::new("c1"))
        );
        assert_eq!(ScopeKey::Workspace.collection_id(), None);
    }

    #[test]
    fn test_scope_key_display() {
        assert_eq!(ScopeKey::Workspace.to_string(), "workspace");
        assert_eq!(ScopeKey::collection("c1").to_string(), "collection c1");
    }

    #[test]
    fn test_environment_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&EnvironmentId::new("env-1")).unwrap_or_default();
        assert_eq!(json, "\"env-1\"");
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(EnvironmentId::generate(), EnvironmentId::generate());
    }
}
