//! Request context as reported by the tab/context provider.

use crate::environment::{CollectionId, ScopeKey};
use crate::error::{DomainError, DomainResult};

/// The request currently in focus.
///
/// Only a saved request that belongs to a collection is eligible for
/// collection-scoped environments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Option<String>,
    collection_id: Option<CollectionId>,
    saved: bool,
}

impl RequestContext {
    /// A context with no request open.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// An unsaved request.
    #[must_use]
    pub fn unsaved(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            collection_id: None,
            saved: false,
        }
    }

    /// A request saved in a collection.
    #[must_use]
    pub fn saved_in(request_id: impl Into<String>, collection_id: impl Into<CollectionId>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            collection_id: Some(collection_id.into()),
            saved: true,
        }
    }

    /// Sets the owning collection, builder style.
    #[must_use]
    pub fn with_collection(mut self, collection_id: impl Into<CollectionId>) -> Self {
        self.collection_id = Some(collection_id.into());
        self
    }

    /// Sets the saved flag, builder style.
    #[must_use]
    pub const fn with_saved(mut self, saved: bool) -> Self {
        self.saved = saved;
        self
    }

    /// Returns the request/tab id, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the owning collection id as reported, regardless of saved status.
    #[must_use]
    pub const fn collection_id(&self) -> Option<&CollectionId> {
        self.collection_id.as_ref()
    }

    /// Returns true if the request is saved.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        self.saved
    }

    /// Returns the collection eligible for collection-scoped environments.
    #[must_use]
    pub fn eligible_collection(&self) -> Option<&CollectionId> {
        self.collection_id.as_ref().filter(|_| self.saved)
    }

    /// Returns the collection scope key for this request.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingContext`] if the request is unsaved or has no collection.
    pub fn collection_scope(&self) -> DomainResult<ScopeKey> {
        self.eligible_collection()
            .cloned()
            .map(ScopeKey::Collection)
            .ok_or(DomainError::MissingContext)
    }

    /// Returns true if the scope key applies to this request.
    #[must_use]
    pub fn admits(&self, key: &ScopeKey) -> bool {
        match key {
            ScopeKey::Workspace => true,
            ScopeKey::Collection(id) => self.eligible_collection() == Some(id),
        }
    }
}
