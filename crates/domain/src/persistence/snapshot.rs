//! Workspace environment snapshot (`environments.json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::environment::{
    ActiveSelectionTracker, CollectionId, Environment, EnvironmentId, EnvironmentRegistry,
    ScopeKey, VariableMap,
};
use crate::error::DomainResult;

/// Current schema version of the snapshot file.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// One stored environment: `{ id, name, variables }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    /// Environment id.
    pub id: EnvironmentId,
    /// Display name.
    pub name: String,
    /// Variables in display order.
    #[serde(default)]
    pub variables: VariableMap,
}

impl From<&Environment> for EnvironmentRecord {
    fn from(environment: &Environment) -> Self {
        Self {
            id: environment.id().clone(),
            name: environment.name().to_string(),
            variables: environment.variables().clone(),
        }
    }
}

impl From<EnvironmentRecord> for Environment {
    fn from(record: EnvironmentRecord) -> Self {
        Self::with_id(record.id, record.name).with_variables(record.variables)
    }
}

/// Stored active selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRecord {
    /// Active workspace environment id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<EnvironmentId>,
    /// Active environment id per collection.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub collections: BTreeMap<CollectionId, EnvironmentId>,
}

/// Everything the environment core needs from the backing store.
///
/// Fields are ordered alphabetically for deterministic serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// Active selections.
    #[serde(default)]
    pub active: ActiveRecord,
    /// Collection environments per collection id.
    #[serde(default)]
    pub collections: BTreeMap<CollectionId, Vec<EnvironmentRecord>>,
    /// Schema version for migration support.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Workspace environments.
    #[serde(default)]
    pub workspace: Vec<EnvironmentRecord>,
}

impl Default for WorkspaceSnapshot {
    fn default() -> Self {
        Self {
            active: ActiveRecord::default(),
            collections: BTreeMap::new(),
            schema_version: CURRENT_SCHEMA_VERSION,
            workspace: Vec::new(),
        }
    }
}

impl WorkspaceSnapshot {
    /// Captures the current registry and selections.
    #[must_use]
    pub fn capture(registry: &EnvironmentRegistry, selection: &ActiveSelectionTracker) -> Self {
        let workspace = registry
            .list(&ScopeKey::Workspace)
            .iter()
            .map(EnvironmentRecord::from)
            .collect();

        let collections = registry
            .collection_ids()
            .map(|id| {
                let records = registry
                    .list(&ScopeKey::Collection(id.clone()))
                    .iter()
                    .map(EnvironmentRecord::from)
                    .collect();
                (id.clone(), records)
            })
            .collect();

        let mut active = ActiveRecord::default();
        for (key, id) in selection.selections() {
            match key {
                ScopeKey::Workspace => active.workspace = Some(id.clone()),
                ScopeKey::Collection(collection) => {
                    active.collections.insert(collection, id.clone());
                }
            }
        }

        Self {
            active,
            collections,
            schema_version: CURRENT_SCHEMA_VERSION,
            workspace,
        }
    }

    /// Builds the registry and selection tracker from this snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateEnvironment`](crate::DomainError::DuplicateEnvironment)
    /// if a scope lists the same id twice.
    pub fn hydrate(self) -> DomainResult<(EnvironmentRegistry, ActiveSelectionTracker)> {
        let mut registry = EnvironmentRegistry::new();
        for record in self.workspace {
            registry.insert(&ScopeKey::Workspace, record.into())?;
        }
        for (collection, records) in self.collections {
            let key = ScopeKey::Collection(collection);
            for record in records {
                registry.insert(&key, record.into())?;
            }
        }

        let mut selection = ActiveSelectionTracker::new();
        if let Some(id) = self.active.workspace {
            selection.set_active(&ScopeKey::Workspace, id);
        }
        for (collection, id) in self.active.collections {
            selection.set_active(&ScopeKey::Collection(collection), id);
        }

        Ok((registry, selection))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::environment::VariableValue;
    use crate::error::DomainError;
    use pretty_assertions::assert_eq;

    const SNAPSHOT: &str = r#"{
        "workspace": [
            { "id": "w1", "name": "Local", "variables": { "host": "a.com", "port": 8080 } }
        ],
        "collections": {
            "c1": [ { "id": "c1-dev", "name": "Dev", "variables": { "token": "t1" } } ]
        },
        "active": { "workspace": "w1", "collections": { "c1": "c1-dev" } }
    }"#;

    #[test]
    fn test_deserialize_record_shape() {
        let snapshot: WorkspaceSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        assert_eq!(snapshot.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(snapshot.workspace[0].id, EnvironmentId::new("w1"));
        assert_eq!(
            snapshot.workspace[0].variables.get("port"),
            Some(&VariableValue::from(8080_i64))
        );
    }

    #[test]
    fn test_hydrate_builds_registry_and_selection() {
        let snapshot: WorkspaceSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let (registry, selection) = snapshot.hydrate().unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            selection.get_active(&ScopeKey::collection("c1")),
            Some(&EnvironmentId::new("c1-dev"))
        );
        assert!(registry.contains(&ScopeKey::collection("c1"), &EnvironmentId::new("c1-dev")));
    }

    #[test]
    fn test_capture_after_hydrate_is_identity() {
        let snapshot: WorkspaceSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let (registry, selection) = snapshot.clone().hydrate().unwrap();
        assert_eq!(WorkspaceSnapshot::capture(&registry, &selection), snapshot);
    }

    #[test]
    fn test_hydrate_rejects_duplicate_ids() {
        let snapshot: WorkspaceSnapshot = serde_json::from_str(
            r#"{ "workspace": [ { "id": "w1", "name": "A" }, { "id": "w1", "name": "B" } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            snapshot.hydrate(),
            Err(DomainError::DuplicateEnvironment { .. })
        ));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot: WorkspaceSnapshot = serde_json::from_str("{}").unwrap();
        let (registry, selection) = snapshot.hydrate().unwrap();
        assert!(registry.is_empty());
        assert_eq!(selection.selections().count(), 0);
    }
}
