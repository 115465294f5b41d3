//! Precedence resolution of the active environments.
//!
//! Variables are merged in order of precedence (highest wins):
//! 1. Active collection environment (only for saved requests in a collection)
//! 2. Active workspace environment

use indexmap::IndexMap;

use super::registry::EnvironmentRegistry;
use super::scope::{EnvironmentId, Scope, ScopeKey};
use super::selection::ActiveSelectionTracker;
use super::variable::{Environment, VariableMap, VariableValue};
use crate::context::RequestContext;

/// A resolved variable with its value and origin scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariable {
    /// The resolved value.
    pub value: VariableValue,
    /// The scope the value came from.
    pub scope: Scope,
}

/// The effective variables for a request, after precedence is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedVariables {
    entries: IndexMap<String, ResolvedVariable>,
}

impl ResolvedVariables {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a variable with its origin scope.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&ResolvedVariable> {
        self.entries.get(name)
    }

    /// Looks up just the value of a variable.
    #[must_use]
    pub fn resolve_value(&self, name: &str) -> Option<&VariableValue> {
        self.resolve(name).map(|r| &r.value)
    }

    /// Iterates variables in merge order: workspace keys first, then collection-only keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedVariable)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of effective variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no variable is in effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the plain name → value mapping.
    #[must_use]
    pub fn to_map(&self) -> VariableMap {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect()
    }

    fn overlay(&mut self, variables: &VariableMap, scope: Scope) {
        for (name, value) in variables {
            self.entries.insert(
                name.clone(),
                ResolvedVariable {
                    value: value.clone(),
                    scope,
                },
            );
        }
    }
}

/// Merges workspace and collection environments into the effective set.
///
/// Collection values override workspace values of the same name.
#[must_use]
pub fn merge_environments(
    workspace: Option<&Environment>,
    collection: Option<&Environment>,
) -> ResolvedVariables {
    let mut resolved = ResolvedVariables::new();
    if let Some(env) = workspace {
        resolved.overlay(env.variables(), Scope::Workspace);
    }
    if let Some(env) = collection {
        resolved.overlay(env.variables(), Scope::Collection);
    }
    resolved
}

/// Computes the effective variables for request contexts.
///
/// Pure and uncached: every call reads the current registry and selection.
#[derive(Debug, Clone, Copy)]
pub struct PrecedenceResolver<'a> {
    registry: &'a EnvironmentRegistry,
    selection: &'a ActiveSelectionTracker,
}

impl<'a> PrecedenceResolver<'a> {
    /// Creates a resolver over the given registry and selection.
    #[must_use]
    pub const fn new(registry: &'a EnvironmentRegistry, selection: &'a ActiveSelectionTracker) -> Self {
        Self {
            registry,
            selection,
        }
    }

    /// Resolves the effective variables for a request context.
    ///
    /// A missing selection, an unknown active id, or an unsaved request contributes nothing.
    #[must_use]
    pub fn resolve(&self, context: &RequestContext) -> ResolvedVariables {
        let active = self.selection.active_for(context);

        let workspace = active
            .workspace
            .as_ref()
            .and_then(|id| self.lookup(&ScopeKey::Workspace, id));
        let collection = active
            .collection
            .as_ref()
            .and_then(|(key, id)| self.lookup(key, id));

        merge_environments(workspace, collection)
    }

    fn lookup(&self, key: &ScopeKey, id: &EnvironmentId) -> Option<&'a Environment> {
        self.registry.find(key, id).ok()
    }
}
