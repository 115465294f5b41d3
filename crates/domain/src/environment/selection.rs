//! Active environment selection per scope key.

use std::collections::HashMap;

use super::scope::{CollectionId, EnvironmentId, ScopeKey};
use crate::context::RequestContext;
use crate::error::{DomainError, DomainResult};

/// Active environment ids that apply to one request context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveEnvironments {
    /// Active workspace environment.
    pub workspace: Option<EnvironmentId>,
    /// Collection scope key and its active environment, if the request is eligible.
    pub collection: Option<(ScopeKey, EnvironmentId)>,
}

/// Tracks which single environment is active for each scope key.
///
/// Selections are stored per collection id and survive request switches; the
/// tracker only recomputes which collection key applies to the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelectionTracker {
    workspace: Option<EnvironmentId>,
    collections: HashMap<CollectionId, EnvironmentId>,
    applicable: Option<CollectionId>,
}

impl ActiveSelectionTracker {
    /// Creates a tracker with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active id for a scope key, if any.
    #[must_use]
    pub fn get_active(&self, key: &ScopeKey) -> Option<&EnvironmentId> {
        match key {
            ScopeKey::Workspace => self.workspace.as_ref(),
            ScopeKey::Collection(id) => self.collections.get(id),
        }
    }

    /// Overwrites the selection for a scope key and returns the previous one.
    ///
    /// The id is not checked against the registry.
    pub fn set_active(&mut self, key: &ScopeKey, id: EnvironmentId) -> Option<EnvironmentId> {
        match key {
            ScopeKey::Workspace => self.workspace.replace(id),
            ScopeKey::Collection(collection) => self.collections.insert(collection.clone(), id),
        }
    }

    /// Clears the selection for a scope key and returns the previous one.
    pub fn clear_active(&mut self, key: &ScopeKey) -> Option<EnvironmentId> {
        match key {
            ScopeKey::Workspace => self.workspace.take(),
            ScopeKey::Collection(collection) => self.collections.remove(collection),
        }
    }

    /// Recomputes the applicable collection key from a new request context.
    ///
    /// Returns true if the applicable collection changed.
    pub fn set_context(&mut self, context: &RequestContext) -> bool {
        let applicable = context.eligible_collection().cloned();
        if applicable == self.applicable {
            return false;
        }
        self.applicable = applicable;
        true
    }

    /// Returns the collection key applicable to the current request, if any.
    #[must_use]
    pub fn applicable_collection(&self) -> Option<ScopeKey> {
        self.applicable.clone().map(ScopeKey::Collection)
    }

    /// Returns the collection scope key of the current request context.
    ///
    /// # Errors
    ///
    /// [`DomainError::MissingContext`] when the current request is unsaved or unowned.
    pub fn collection_key(&self) -> DomainResult<ScopeKey> {
        self.applicable_collection().ok_or(DomainError::MissingContext)
    }

    /// Returns the active environments for the current request context.
    #[must_use]
    pub fn current(&self) -> ActiveEnvironments {
        self.active_for_collection(self.applicable.as_ref())
    }

    /// Returns the active environments for an arbitrary request context.
    #[must_use]
    pub fn active_for(&self, context: &RequestContext) -> ActiveEnvironments {
        self.active_for_collection(context.eligible_collection())
    }

    /// Iterates every stored selection, workspace first.
    pub fn selections(&self) -> impl Iterator<Item = (ScopeKey, &EnvironmentId)> {
        self.workspace
            .iter()
            .map(|id| (ScopeKey::Workspace, id))
            .chain(
                self.collections
                    .iter()
                    .map(|(collection, id)| (ScopeKey::Collection(collection.clone()), id)),
            )
    }

    fn active_for_collection(&self, collection: Option<&CollectionId>) -> ActiveEnvironments {
        ActiveEnvironments {
            workspace: self.workspace.clone(),
            collection: collection.and_then(|c| {
                self.collections
                    .get(c)
                    .map(|id| (ScopeKey::Collection(c.clone()), id.clone()))
            }),
        }
    }
}
