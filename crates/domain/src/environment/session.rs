//! Edit session over one environment's variables.
//!
//! The session keeps the raw draft text apart from the last draft that parsed, so
//! live input is never lost to a parse error. Dirtiness is always recomputed against
//! the committed baseline, never cached across edits.

use super::draft::{parse_draft_lenient, parse_variables, serialize_variables};
use super::registry::EnvironmentRegistry;
use super::scope::{EnvironmentId, ScopeKey};
use super::variable::{Environment, VariableMap, variables_equal};
use crate::error::{DomainError, DomainResult};

/// Outcome of [`EditSession::on_external_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalChange {
    /// Target still exists; baseline refreshed, draft kept.
    Refreshed,
    /// The active id moved to another environment; the session was reset onto it.
    Retargeted,
    /// The target vanished; draft kept, commit disallowed.
    TargetMissing,
    /// Nothing is active for the scope any more; the session should be closed.
    Deactivated,
}

/// Working draft of one environment's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    key: ScopeKey,
    target: EnvironmentId,
    indent: usize,
    baseline: Option<VariableMap>,
    draft: String,
    last_parsed: Option<VariableMap>,
    parse_error: Option<String>,
    dirty: bool,
}

impl EditSession {
    /// Opens a session on the committed variables of an environment.
    ///
    /// If the environment is not registered the draft is empty and commit is disallowed.
    #[must_use]
    pub fn open(
        registry: &EnvironmentRegistry,
        key: ScopeKey,
        target: EnvironmentId,
        indent: usize,
    ) -> Self {
        let baseline = registry.find(&key, &target).ok().map(|e| e.variables().clone());
        let draft = baseline
            .as_ref()
            .map(|vars| serialize_variables(vars, indent))
            .unwrap_or_default();

        Self {
            key,
            target,
            indent,
            last_parsed: baseline.clone(),
            baseline,
            draft,
            parse_error: None,
            dirty: false,
        }
    }

    /// Returns the scope key of the edited environment.
    #[must_use]
    pub const fn key(&self) -> &ScopeKey {
        &self.key
    }

    /// Returns the id of the edited environment.
    #[must_use]
    pub const fn target(&self) -> &EnvironmentId {
        &self.target
    }

    /// Returns the current draft text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Returns the committed variables the draft is compared against.
    #[must_use]
    pub const fn baseline(&self) -> Option<&VariableMap> {
        self.baseline.as_ref()
    }

    /// Returns the most recent draft that parsed successfully.
    #[must_use]
    pub const fn last_parsed(&self) -> Option<&VariableMap> {
        self.last_parsed.as_ref()
    }

    /// Returns the parse error of the current draft, if it does not parse.
    #[must_use]
    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    /// Returns true if the draft differs from the baseline or does not parse.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns true if the target has a committed baseline to replace.
    #[must_use]
    pub const fn can_commit(&self) -> bool {
        self.baseline.is_some()
    }

    /// Replaces the draft text verbatim. Always accepted, even if it does not parse.
    pub fn edit(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
        self.recompute();
    }

    /// Reacts to the environment list or active id changing outside this session.
    pub fn on_external_change(
        &mut self,
        environments: &[Environment],
        active: Option<&EnvironmentId>,
    ) -> ExternalChange {
        let Some(active) = active else {
            return ExternalChange::Deactivated;
        };

        if active != &self.target {
            let baseline = environments
                .iter()
                .find(|e| e.id() == active)
                .map(|e| e.variables().clone());
            self.target = active.clone();
            self.baseline = baseline;
            self.reset_draft();
            return ExternalChange::Retargeted;
        }

        match environments.iter().find(|e| e.id() == &self.target) {
            Some(environment) => {
                self.baseline = Some(environment.variables().clone());
                self.recompute();
                ExternalChange::Refreshed
            }
            None => {
                self.baseline = None;
                self.recompute();
                ExternalChange::TargetMissing
            }
        }
    }

    /// Parses the draft into the mapping that a commit would apply.
    ///
    /// # Errors
    ///
    /// [`DomainError::CommitDisallowed`] without a baseline, [`DomainError::InvalidFormat`]
    /// if the draft does not parse.
    pub fn prepare_commit(&self) -> DomainResult<VariableMap> {
        if self.baseline.is_none() {
            return Err(DomainError::CommitDisallowed(self.target.clone()));
        }
        parse_variables(&self.draft)
    }

    /// Commits the draft into the registry and resets the session onto the new baseline.
    ///
    /// Either the whole parsed mapping replaces the committed variables or nothing changes.
    ///
    /// # Errors
    ///
    /// Errors from [`prepare_commit`](Self::prepare_commit) or
    /// [`EnvironmentRegistry::replace_variables`]; the draft is left as typed.
    pub fn commit(&mut self, registry: &mut EnvironmentRegistry) -> DomainResult<VariableMap> {
        let variables = self.prepare_commit()?;
        registry.replace_variables(&self.key, &self.target, variables.clone())?;
        self.baseline = Some(variables.clone());
        self.reset_draft();
        Ok(variables)
    }

    /// Reverts the draft to the serialized baseline.
    pub fn discard(&mut self) {
        self.reset_draft();
    }

    fn reset_draft(&mut self) {
        self.draft = self
            .baseline
            .as_ref()
            .map(|vars| serialize_variables(vars, self.indent))
            .unwrap_or_default();
        self.recompute();
    }

    fn recompute(&mut self) {
        match parse_draft_lenient(&self.draft) {
            Ok(parsed) => {
                let empty = VariableMap::new();
                let baseline = self.baseline.as_ref().unwrap_or(&empty);
                self.dirty = !variables_equal(&parsed, baseline);
                self.last_parsed = Some(parsed);
                self.parse_error = None;
            }
            Err(err) => {
                self.dirty = true;
                self.parse_error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::environment::{DEFAULT_INDENT, VariableValue};
    use pretty_assertions::assert_eq;

    fn registry() -> EnvironmentRegistry {
        let mut reg = EnvironmentRegistry::new();
        reg.insert(
            &ScopeKey::Workspace,
            Environment::with_id("w1", "Local")
                .with_variable("host", "a.com")
                .with_variable("port", 443_i64),
        )
        .unwrap();
        reg.insert(&ScopeKey::Workspace, Environment::with_id("w2", "Prod").with_variable("host", "p.com"))
            .unwrap();
        reg
    }

    fn open(reg: &EnvironmentRegistry, id: &str) -> EditSession {
        EditSession::open(reg, ScopeKey::Workspace, EnvironmentId::new(id), DEFAULT_INDENT)
    }

    #[test]
    fn test_open_serializes_baseline() {
        let reg = registry();
        let session = open(&reg, "w1");

        assert_eq!(session.draft(), "{\n  \"host\": \"a.com\",\n  \"port\": 443\n}");
        assert!(!session.is_dirty());
        assert!(session.can_commit());
    }

    #[test]
    fn test_open_unknown_environment_disallows_commit() {
        let mut reg = registry();
        let mut session = open(&reg, "ghost");

        assert_eq!(session.draft(), "");
        assert!(!session.is_dirty());
        assert!(!session.can_commit());

        session.edit(r#"{"a": "b"}"#);
        let err = session.commit(&mut reg).unwrap_err();
        assert_eq!(err, DomainError::CommitDisallowed(EnvironmentId::new("ghost")));
    }

    #[test]
    fn test_edit_marks_dirty_and_back() {
        let reg = registry();
        let mut session = open(&reg, "w1");

        session.edit(r#"{"host": "b.com", "port": 443}"#);
        assert!(session.is_dirty());

        // same content, different order and formatting
        session.edit(r#"{"port": 443, "host": "a.com"}"#);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_unparsable_draft_is_dirty_and_keeps_last_parsed() {
        let reg = registry();
        let mut session = open(&reg, "w1");
        session.edit(r#"{"host": "b.com"}"#);
        session.edit(r#"{"host": "b.com""#);

        assert!(session.is_dirty());
        assert!(session.parse_error().is_some());
        assert_eq!(session.draft(), r#"{"host": "b.com""#);
        assert_eq!(
            session.last_parsed().and_then(|v| v.get("host")),
            Some(&VariableValue::from("b.com"))
        );
    }

    #[test]
    fn test_commit_invalid_format_changes_nothing() {
        let mut reg = registry();
        let before = reg.clone();
        let mut session = open(&reg, "w1");

        session.edit(r#"{"a":1,}"#);
        let err = session.commit(&mut reg).unwrap_err();

        assert!(matches!(err, DomainError::InvalidFormat(_)));
        assert_eq!(reg, before);
        assert_eq!(session.draft(), r#"{"a":1,}"#);
        assert!(session.is_dirty());
    }

    #[test]
    fn test_commit_blank_draft_is_invalid_format() {
        let mut reg = registry();
        let before = reg.clone();
        let mut session = open(&reg, "w1");

        session.edit("   ");
        assert!(session.is_dirty());
        let err = session.commit(&mut reg).unwrap_err();

        assert!(matches!(err, DomainError::InvalidFormat(_)));
        assert_eq!(reg, before);
        assert_eq!(session.draft(), "   ");
    }

    #[test]
    fn test_large_integer_change_is_dirty() {
        let mut reg = EnvironmentRegistry::new();
        reg.insert(
            &ScopeKey::Workspace,
            Environment::with_id("w", "Big").with_variable("n", 9_007_199_254_740_992_i64),
        )
        .unwrap();
        let mut session = open(&reg, "w");

        session.edit(r#"{"n": 9007199254740993}"#);
        assert!(session.is_dirty());

        session.edit(r#"{"n": 9007199254740992}"#);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_commit_replaces_registry_and_resets() {
        let mut reg = registry();
        let mut session = open(&reg, "w1");

        session.edit(r#"{"host": "b.com", "token": "t1"}"#);
        let committed = session.commit(&mut reg).unwrap();

        let stored = reg.find(&ScopeKey::Workspace, &EnvironmentId::new("w1")).unwrap();
        assert_eq!(stored.variables(), &committed);
        assert!(!session.is_dirty());
        assert_eq!(session.baseline(), Some(&committed));

        // reopening reproduces the reset draft byte for byte
        assert_eq!(open(&reg, "w1").draft(), session.draft());
    }

    #[test]
    fn test_discard_restores_baseline() {
        let reg = registry();
        let mut session = open(&reg, "w1");
        let original = session.draft().to_string();

        session.edit("not json");
        session.discard();

        assert!(!session.is_dirty());
        assert_eq!(session.draft(), original);
        assert_eq!(
            parse_variables(session.draft()).ok().as_ref(),
            session.baseline()
        );
    }

    #[test]
    fn test_external_change_keeps_draft_and_refreshes_dirty() {
        let mut reg = registry();
        let mut session = open(&reg, "w1");
        let draft = r#"{"host": "b.com", "port": 443}"#;
        session.edit(draft);
        assert!(session.is_dirty());

        // someone else commits exactly what we typed
        let mut vars = VariableMap::new();
        vars.insert("host".to_string(), "b.com".into());
        vars.insert("port".to_string(), 443_i64.into());
        reg.replace_variables(&ScopeKey::Workspace, &EnvironmentId::new("w1"), vars)
            .unwrap();

        let outcome = session.on_external_change(
            reg.list(&ScopeKey::Workspace),
            Some(&EnvironmentId::new("w1")),
        );

        assert_eq!(outcome, ExternalChange::Refreshed);
        assert_eq!(session.draft(), draft);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_external_change_retargets_on_active_switch() {
        let reg = registry();
        let mut session = open(&reg, "w1");
        session.edit("{}");

        let outcome = session.on_external_change(
            reg.list(&ScopeKey::Workspace),
            Some(&EnvironmentId::new("w2")),
        );

        assert_eq!(outcome, ExternalChange::Retargeted);
        assert_eq!(session.target(), &EnvironmentId::new("w2"));
        assert_eq!(session.draft(), "{\n  \"host\": \"p.com\"\n}");
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_external_change_target_missing() {
        let reg = registry();
        let mut session = open(&reg, "w1");
        session.edit(r#"{"x": "1"}"#);

        let outcome = session.on_external_change(&[], Some(&EnvironmentId::new("w1")));

        assert_eq!(outcome, ExternalChange::TargetMissing);
        assert_eq!(session.draft(), r#"{"x": "1"}"#);
        assert!(!session.can_commit());
    }

    #[test]
    fn test_external_change_deactivated() {
        let reg = registry();
        let mut session = open(&reg, "w1");
        let outcome = session.on_external_change(reg.list(&ScopeKey::Workspace), None);
        assert_eq!(outcome, ExternalChange::Deactivated);
    }
}
