//! Environment workbench
//!
//! Coordinates the registry, the active selection, open edit sessions and change
//! propagation for one workspace. Every event runs to completion synchronously:
//! the registry is mutated first, then subscribers are notified, then derived state
//! is recomputed on demand.

use std::collections::HashMap;
use std::fmt;

use envscope_domain::{
    ActiveSelectionTracker, DomainError, EditSession, Environment, EnvironmentId,
    EnvironmentRegistry, ExternalChange, PrecedenceResolver, RequestContext, ResolvedVariables,
    ScopeKey, VariableMap, WorkbenchSettings, WorkspaceSnapshot,
};
use tracing::{debug, info, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{ExecutionContext, Notifier};
use crate::propagation::{Change, ChangePropagator, StateSlice, SubscriptionId};

/// Owns the environment state of a workspace and applies user events to it.
pub struct EnvironmentWorkbench {
    registry: EnvironmentRegistry,
    selection: ActiveSelectionTracker,
    propagator: ChangePropagator,
    notifier: Box<dyn Notifier>,
    sessions: HashMap<ScopeKey, EditSession>,
    context: RequestContext,
    settings: WorkbenchSettings,
    panel_open: bool,
}

impl EnvironmentWorkbench {
    /// Creates a workbench over already loaded state.
    #[must_use]
    pub fn new(
        registry: EnvironmentRegistry,
        selection: ActiveSelectionTracker,
        execution: Box<dyn ExecutionContext>,
        notifier: Box<dyn Notifier>,
        settings: WorkbenchSettings,
    ) -> Self {
        Self {
            registry,
            selection,
            propagator: ChangePropagator::new(execution),
            notifier,
            sessions: HashMap::new(),
            context: RequestContext::none(),
            settings,
            panel_open: false,
        }
    }

    /// Creates a workbench from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot holds duplicate environment ids.
    pub fn from_snapshot(
        snapshot: WorkspaceSnapshot,
        execution: Box<dyn ExecutionContext>,
        notifier: Box<dyn Notifier>,
        settings: WorkbenchSettings,
    ) -> ApplicationResult<Self> {
        let (registry, selection) = snapshot.hydrate()?;
        Ok(Self::new(registry, selection, execution, notifier, settings))
    }

    /// Returns the environment registry.
    #[must_use]
    pub const fn registry(&self) -> &EnvironmentRegistry {
        &self.registry
    }

    /// Returns the active selection.
    #[must_use]
    pub const fn selection(&self) -> &ActiveSelectionTracker {
        &self.selection
    }

    /// Returns the current request context.
    #[must_use]
    pub const fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Returns the workbench settings.
    #[must_use]
    pub const fn settings(&self) -> &WorkbenchSettings {
        &self.settings
    }

    /// Returns true while the active-environments panel is open.
    #[must_use]
    pub const fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Number of notifications delivered so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.propagator.revision()
    }

    /// Lists the environments of a scope.
    #[must_use]
    pub fn environments(&self, key: &ScopeKey) -> &[Environment] {
        self.registry.list(key)
    }

    /// Returns the active id for a scope key.
    #[must_use]
    pub fn active(&self, key: &ScopeKey) -> Option<&EnvironmentId> {
        self.selection.get_active(key)
    }

    /// Resolves the effective variables for the current request.
    #[must_use]
    pub fn resolve(&self) -> ResolvedVariables {
        self.resolve_for(&self.context)
    }

    /// Resolves the effective variables for another request.
    #[must_use]
    pub fn resolve_for(&self, context: &RequestContext) -> ResolvedVariables {
        PrecedenceResolver::new(&self.registry, &self.selection).resolve(context)
    }

    /// Captures the current state for persistence.
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot::capture(&self.registry, &self.selection)
    }

    /// Subscribes to a state slice.
    pub fn subscribe(
        &mut self,
        slice: StateSlice,
        callback: impl FnMut(&Change) + 'static,
    ) -> SubscriptionId {
        self.propagator.subscribe(slice, callback)
    }

    /// Removes a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.propagator.unsubscribe(id)
    }

    /// Switches to another request or tab.
    ///
    /// All edit sessions are dropped. If the panel is open, sessions are reopened
    /// on whatever is active for the new request. The execution context receives the
    /// variables resolved for the new request; subscribers are not notified.
    pub fn set_request_context(&mut self, context: RequestContext) {
        let changed = self.selection.set_context(&context);
        debug!(
            request = context.request_id().unwrap_or("-"),
            collection_changed = changed,
            dropped_sessions = self.sessions.len(),
            "Request context switched"
        );
        self.context = context;
        self.sessions.clear();
        if self.panel_open {
            self.open_active_sessions();
        }
        self.propagator.push_resolved(&self.resolve());
    }

    /// Opens the active-environments panel and a session for each active environment.
    pub fn open_panel(&mut self) {
        if self.panel_open {
            return;
        }
        self.panel_open = true;
        self.open_active_sessions();
    }

    /// Closes the panel and drops every session, discarding unsaved drafts.
    pub fn close_panel(&mut self) {
        self.panel_open = false;
        if !self.sessions.is_empty() {
            debug!(count = self.sessions.len(), "Closing edit sessions");
        }
        self.sessions.clear();
    }

    /// Opens or closes the panel. Returns the new state.
    pub fn toggle_panel(&mut self) -> bool {
        if self.panel_open {
            self.close_panel();
        } else {
            self.open_panel();
        }
        self.panel_open
    }

    /// Opens an edit session on the active environment of a scope.
    ///
    /// An already open session for the scope is replaced.
    ///
    /// # Errors
    ///
    /// [`DomainError::MissingContext`] if the scope does not apply to the current request,
    /// [`ApplicationError::NoActiveEnvironment`] if nothing is active for it.
    pub fn open_session(&mut self, key: &ScopeKey) -> ApplicationResult<&EditSession> {
        if !self.context.admits(key) {
            return Err(DomainError::MissingContext.into());
        }
        let target = self
            .selection
            .get_active(key)
            .cloned()
            .ok_or_else(|| ApplicationError::NoActiveEnvironment(key.clone()))?;

        debug!(scope = %key, environment = %target, "Opening edit session");
        let session = EditSession::open(&self.registry, key.clone(), target, self.settings.indent());
        self.sessions.insert(key.clone(), session);
        self.session(key)
            .ok_or_else(|| ApplicationError::NoSession(key.clone()))
    }

    /// Returns the open session for a scope.
    #[must_use]
    pub fn session(&self, key: &ScopeKey) -> Option<&EditSession> {
        self.sessions.get(key)
    }

    /// Closes the session for a scope. Returns false if none was open.
    pub fn close_session(&mut self, key: &ScopeKey) -> bool {
        self.sessions.remove(key).is_some()
    }

    /// Replaces the draft of a session.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::NoSession`] if no session is open for the scope.
    pub fn edit_draft(&mut self, key: &ScopeKey, draft: impl Into<String>) -> ApplicationResult<()> {
        self.session_mut(key)?.edit(draft);
        Ok(())
    }

    /// Reverts the draft of a session to its baseline.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::NoSession`] if no session is open for the scope.
    pub fn discard(&mut self, key: &ScopeKey) -> ApplicationResult<()> {
        self.session_mut(key)?.discard();
        Ok(())
    }

    /// Commits the draft of a session.
    ///
    /// On an unparsable draft the notifier is alerted and nothing changes.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::NoSession`] without a session, or the domain error from
    /// the commit (`InvalidFormat`, `CommitDisallowed`, `NotFound`).
    pub fn commit(&mut self, key: &ScopeKey) -> ApplicationResult<VariableMap> {
        let session = self
            .sessions
            .get_mut(key)
            .ok_or_else(|| ApplicationError::NoSession(key.clone()))?;
        let target = session.target().clone();

        match session.commit(&mut self.registry) {
            Ok(variables) => {
                info!(scope = %key, environment = %target, count = variables.len(), "Committed variables");
                self.propagate(Change::CommittedVariables {
                    key: key.clone(),
                    environment: target,
                });
                Ok(variables)
            }
            Err(DomainError::InvalidFormat(reason)) => {
                warn!(scope = %key, environment = %target, %reason, "Rejected draft");
                self.notifier.alert(&self.settings.invalid_format_message);
                Err(DomainError::InvalidFormat(reason).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Changes the active environment of a scope, or clears it with `None`.
    ///
    /// An open session on the scope is reset onto the new environment, or closed when
    /// the selection is cleared. Always propagates, even if the id is unchanged.
    pub fn set_active(&mut self, key: &ScopeKey, environment: Option<EnvironmentId>) {
        let previous = match &environment {
            Some(id) => self.selection.set_active(key, id.clone()),
            None => self.selection.clear_active(key),
        };
        info!(
            scope = %key,
            from = ?previous.as_ref().map(EnvironmentId::as_str),
            to = ?environment.as_ref().map(EnvironmentId::as_str),
            "Active environment changed"
        );

        if self.sessions.contains_key(key) {
            self.refresh_session(key);
        } else if self.panel_open && environment.is_some() && self.context.admits(key) {
            self.open_session_quietly(key);
        }

        self.propagate(Change::ActiveSelection {
            key: key.clone(),
            environment,
        });
    }

    /// Replaces the variables of an environment from outside any session.
    ///
    /// An open session on the same scope keeps its draft and re-evaluates dirtiness
    /// against the new baseline. A later commit from that session overwrites this update.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotFound`] if the environment does not exist in the scope.
    pub fn update_variables(
        &mut self,
        key: &ScopeKey,
        id: &EnvironmentId,
        variables: VariableMap,
    ) -> ApplicationResult<()> {
        self.registry.replace_variables(key, id, variables)?;
        info!(scope = %key, environment = %id, "Variables updated externally");

        self.refresh_session(key);
        self.propagate(Change::CommittedVariables {
            key: key.clone(),
            environment: id.clone(),
        });
        Ok(())
    }

    fn session_mut(&mut self, key: &ScopeKey) -> ApplicationResult<&mut EditSession> {
        self.sessions
            .get_mut(key)
            .ok_or_else(|| ApplicationError::NoSession(key.clone()))
    }

    fn open_active_sessions(&mut self) {
        let keys: Vec<ScopeKey> = std::iter::once(ScopeKey::Workspace)
            .chain(self.selection.applicable_collection())
            .filter(|key| self.selection.get_active(key).is_some())
            .collect();
        for key in &keys {
            self.open_session_quietly(key);
        }
    }

    fn open_session_quietly(&mut self, key: &ScopeKey) {
        if let Err(err) = self.open_session(key) {
            debug!(scope = %key, error = %err, "Edit session not opened");
        }
    }

    fn refresh_session(&mut self, key: &ScopeKey) {
        let Some(session) = self.sessions.get_mut(key) else {
            return;
        };
        let outcome =
            session.on_external_change(self.registry.list(key), self.selection.get_active(key));
        debug!(scope = %key, ?outcome, "Edit session re-evaluated");
        if outcome == ExternalChange::Deactivated {
            self.sessions.remove(key);
        }
    }

    fn propagate(&mut self, cause: Change) {
        let resolved = self.resolve();
        self.propagator.notify(cause, resolved);
    }
}

impl fmt::Debug for EnvironmentWorkbench {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentWorkbench")
            .field("registry", &self.registry)
            .field("selection", &self.selection)
            .field("propagator", &self.propagator)
            .field("sessions", &self.sessions)
            .field("context", &self.context)
            .field("panel_open", &self.panel_open)
            .finish_non_exhaustive()
    }
}
