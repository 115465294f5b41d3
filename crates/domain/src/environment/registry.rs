//! Environment registry
//!
//! Owns every environment, partitioned by [`ScopeKey`]. After hydration the only
//! mutation is [`EnvironmentRegistry::replace_variables`].

use std::collections::HashMap;

use super::scope::{CollectionId, EnvironmentId, ScopeKey};
use super::variable::{Environment, VariableMap};
use crate::error::{DomainError, DomainResult};

/// The set of environments per scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentRegistry {
    workspace: Vec<Environment>,
    collections: HashMap<CollectionId, Vec<Environment>>,
}

impl EnvironmentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an environment under a scope key, keeping insertion order.
    ///
    /// Used while hydrating from the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateEnvironment`] if the id is already present in that scope.
    pub fn insert(&mut self, key: &ScopeKey, mut environment: Environment) -> DomainResult<()> {
        let slot = match key {
            ScopeKey::Workspace => &mut self.workspace,
            ScopeKey::Collection(id) => self.collections.entry(id.clone()).or_default(),
        };

        if slot.iter().any(|e| e.id() == environment.id()) {
            return Err(DomainError::DuplicateEnvironment {
                scope: key.clone(),
                id: environment.id().clone(),
            });
        }

        environment.set_scope(key.scope());
        slot.push(environment);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn with_environment(mut self, key: &ScopeKey, environment: Environment) -> DomainResult<Self> {
        self.insert(key, environment)?;
        Ok(self)
    }

    /// Lists the environments of a scope in insertion order.
    ///
    /// An unknown collection has no environments.
    #[must_use]
    pub fn list(&self, key: &ScopeKey) -> &[Environment] {
        self.slot(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Finds an environment by id within a scope.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] if the id is not registered in that scope.
    pub fn find(&self, key: &ScopeKey, id: &EnvironmentId) -> DomainResult<&Environment> {
        self.list(key)
            .iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| not_found(key, id))
    }

    /// Returns true if the id is registered in that scope.
    #[must_use]
    pub fn contains(&self, key: &ScopeKey, id: &EnvironmentId) -> bool {
        self.find(key, id).is_ok()
    }

    /// Replaces the variables of one environment as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NotFound`] if the id is not registered in that scope; the
    /// registry is left untouched.
    pub fn replace_variables(
        &mut self,
        key: &ScopeKey,
        id: &EnvironmentId,
        variables: VariableMap,
    ) -> DomainResult<()> {
        let environment = self
            .slot_mut(key)
            .and_then(|slot| slot.iter_mut().find(|e| e.id() == id))
            .ok_or_else(|| not_found(key, id))?;
        environment.replace_variables(variables);
        Ok(())
    }

    /// Returns every collection id that has a registry partition.
    pub fn collection_ids(&self) -> impl Iterator<Item = &CollectionId> {
        self.collections.keys()
    }

    /// Returns the total number of environments across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workspace.len() + self.collections.values().map(Vec::len).sum::<usize>()
    }

    /// Returns true if no environment is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &ScopeKey) -> Option<&Vec<Environment>> {
        match key {
            ScopeKey::Workspace => Some(&self.workspace),
            ScopeKey::Collection(id) => self.collections.get(id),
        }
    }

    fn slot_mut(&mut self, key: &ScopeKey) -> Option<&mut Vec<Environment>> {
        match key {
            ScopeKey::Workspace => Some(&mut self.workspace),
            ScopeKey::Collection(id) => self.collections.get_mut(id),
        }
    }
}

fn not_found(key: &ScopeKey, id: &EnvironmentId) -> DomainError {
    DomainError::NotFound {
        scope: key.clone(),
        id: id.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::environment::{Scope, VariableValue};
    use pretty_assertions::assert_eq;

    fn registry() -> EnvironmentRegistry {
        EnvironmentRegistry::new()
            .with_environment(
                &ScopeKey::Workspace,
                Environment::with_id("w1", "Local").with_variable("host", "a.com"),
            )
            .and_then(|r| {
                r.with_environment(&ScopeKey::Workspace, Environment::with_id("w2", "Prod"))
            })
            .and_then(|r| {
                r.with_environment(
                    &ScopeKey::collection("c1"),
                    Environment::with_id("c1-dev", "Dev").with_variable("token", "t1"),
                )
            })
            .expect("fixture should build")
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let reg = registry();
        let names: Vec<&str> = reg.list(&ScopeKey::Workspace).iter().map(Environment::name).collect();
        assert_eq!(names, vec!["Local", "Prod"]);
    }

    #[test]
    fn test_list_unknown_collection_is_empty() {
        assert!(registry().list(&ScopeKey::collection("nope")).is_empty());
    }

    #[test]
    fn test_insert_sets_scope() {
        let reg = registry();
        let env = reg
            .find(&ScopeKey::collection("c1"), &EnvironmentId::new("c1-dev"))
            .unwrap();
        assert_eq!(env.scope(), Scope::Collection);
    }

    #[test]
    fn test_insert_rejects_duplicate_id_in_same_scope() {
        let mut reg = registry();
        let result = reg.insert(&ScopeKey::Workspace, Environment::with_id("w1", "Again"));
        assert!(matches!(
            result,
            Err(DomainError::DuplicateEnvironment { .. })
        ));
        assert_eq!(reg.list(&ScopeKey::Workspace).len(), 2);
    }

    #[test]
    fn test_same_id_allowed_in_different_scopes() {
        let mut reg = registry();
        reg.insert(&ScopeKey::collection("c2"), Environment::with_id("w1", "Shadow"))
            .unwrap();
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn test_find_is_scoped() {
        let reg = registry();
        let err = reg
            .find(&ScopeKey::Workspace, &EnvironmentId::new("c1-dev"))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::NotFound {
                scope: ScopeKey::Workspace,
                id: EnvironmentId::new("c1-dev"),
            }
        );
    }

    #[test]
    fn test_replace_variables() {
        let mut reg = registry();
        let mut vars = VariableMap::new();
        vars.insert("host".to_string(), "b.com".into());
        vars.insert("port".to_string(), 8080_i64.into());

        reg.replace_variables(&ScopeKey::Workspace, &EnvironmentId::new("w1"), vars.clone())
            .unwrap();

        let env = reg.find(&ScopeKey::Workspace, &EnvironmentId::new("w1")).unwrap();
        assert_eq!(env.variables(), &vars);
        assert_eq!(env.get_variable("host"), Some(&VariableValue::from("b.com")));
    }

    #[test]
    fn test_replace_variables_not_found_leaves_registry_unchanged() {
        let mut reg = registry();
        let before = reg.clone();

        let result = reg.replace_variables(
            &ScopeKey::collection("c9"),
            &EnvironmentId::new("c1-dev"),
            VariableMap::new(),
        );

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(reg, before);
    }
}
