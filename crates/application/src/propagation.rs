//! Change propagation
//!
//! Consumers subscribe to named state slices and are called back synchronously,
//! in subscription order, after every committed mutation.

use std::fmt;

use envscope_domain::{EnvironmentId, ResolvedVariables, ScopeKey};

use crate::ports::ExecutionContext;

/// A named slice of workbench state that can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateSlice {
    /// Which environment is active per scope key.
    ActiveSelection,
    /// Committed variables of an environment.
    CommittedVariables,
    /// The effective variables for the current request.
    ResolvedVariables,
}

/// A change delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// The active environment of a scope key changed.
    ActiveSelection {
        /// Affected scope.
        key: ScopeKey,
        /// New active id, `None` when cleared.
        environment: Option<EnvironmentId>,
    },
    /// New variables were committed to an environment.
    CommittedVariables {
        /// Scope of the environment.
        key: ScopeKey,
        /// The environment that changed.
        environment: EnvironmentId,
    },
    /// The effective variables were recomputed.
    ResolvedVariables(ResolvedVariables),
}

impl Change {
    /// Returns the slice this change belongs to.
    #[must_use]
    pub const fn slice(&self) -> StateSlice {
        match self {
            Self::ActiveSelection { .. } => StateSlice::ActiveSelection,
            Self::CommittedVariables { .. } => StateSlice::CommittedVariables,
            Self::ResolvedVariables(_) => StateSlice::ResolvedVariables,
        }
    }
}

/// Handle returned by [`ChangePropagator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Change)>;

struct Subscription {
    id: SubscriptionId,
    slice: StateSlice,
    callback: Callback,
}

/// Notifies consumers after committed mutations.
///
/// Every notification bumps [`revision`](Self::revision), pushes the freshly resolved
/// variables to the execution context, then calls subscribers of the cause's slice
/// followed by subscribers of [`StateSlice::ResolvedVariables`].
pub struct ChangePropagator {
    execution: Box<dyn ExecutionContext>,
    subscriptions: Vec<Subscription>,
    next_id: u64,
    revision: u64,
}

impl ChangePropagator {
    /// Creates a propagator that pushes to the given execution context.
    #[must_use]
    pub fn new(execution: Box<dyn ExecutionContext>) -> Self {
        Self {
            execution,
            subscriptions: Vec::new(),
            next_id: 0,
            revision: 0,
        }
    }

    /// Registers a callback for one slice.
    pub fn subscribe(
        &mut self,
        slice: StateSlice,
        callback: impl FnMut(&Change) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            slice,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Number of notifications delivered so far.
    ///
    /// Consumers holding derived state compare revisions to know it is stale.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Delivers a committed change together with the recomputed variables.
    pub fn notify(&mut self, cause: Change, resolved: ResolvedVariables) {
        self.revision += 1;
        self.execution.push_resolved_variables(&resolved);
        self.dispatch(&cause);
        if cause.slice() != StateSlice::ResolvedVariables {
            self.dispatch(&Change::ResolvedVariables(resolved));
        }
    }

    /// Pushes resolved variables to the execution context without notifying subscribers.
    ///
    /// Used when the request changes but no committed state did; the revision is kept.
    pub fn push_resolved(&self, resolved: &ResolvedVariables) {
        self.execution.push_resolved_variables(resolved);
    }

    fn dispatch(&mut self, change: &Change) {
        let slice = change.slice();
        for subscription in self.subscriptions.iter_mut().filter(|s| s.slice == slice) {
            (subscription.callback)(change);
        }
    }
}

impl fmt::Debug for ChangePropagator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangePropagator")
            .field("subscriptions", &self.subscriptions.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use envscope_domain::{Environment, environment::merge_environments};

    #[derive(Default, Clone)]
    struct RecordingContext {
        pushes: Rc<RefCell<Vec<ResolvedVariables>>>,
    }

    impl ExecutionContext for RecordingContext {
        fn push_resolved_variables(&self, variables: &ResolvedVariables) {
            self.pushes.borrow_mut().push(variables.clone());
        }
    }

    fn resolved(host: &str) -> ResolvedVariables {
        let env = Environment::with_id("w", "W").with_variable("host", host);
        merge_environments(Some(&env), None)
    }

    fn selection_change() -> Change {
        Change::ActiveSelection {
            key: ScopeKey::Workspace,
            environment: Some(EnvironmentId::new("w")),
        }
    }

    #[test]
    fn test_notify_pushes_to_execution_context() {
        let ctx = RecordingContext::default();
        let mut propagator = ChangePropagator::new(Box::new(ctx.clone()));

        propagator.notify(selection_change(), resolved("a.com"));

        assert_eq!(ctx.pushes.borrow().len(), 1);
        assert_eq!(propagator.revision(), 1);
    }

    #[test]
    fn test_subscribers_only_see_their_slice() {
        let mut propagator = ChangePropagator::new(Box::new(RecordingContext::default()));
        let selections = Rc::new(RefCell::new(Vec::new()));
        let commits = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&selections);
        propagator.subscribe(StateSlice::ActiveSelection, move |change| {
            sink.borrow_mut().push(change.clone());
        });
        let counter = Rc::clone(&commits);
        propagator.subscribe(StateSlice::CommittedVariables, move |_| {
            *counter.borrow_mut() += 1;
        });

        propagator.notify(selection_change(), resolved("a.com"));

        assert_eq!(selections.borrow().as_slice(), &[selection_change()]);
        assert_eq!(*commits.borrow(), 0);
    }

    #[test]
    fn test_resolved_subscribers_follow_the_cause() {
        let mut propagator = ChangePropagator::new(Box::new(RecordingContext::default()));
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&order);
        propagator.subscribe(StateSlice::ResolvedVariables, move |change| {
            log.borrow_mut().push(change.slice());
        });
        let log = Rc::clone(&order);
        propagator.subscribe(StateSlice::CommittedVariables, move |change| {
            log.borrow_mut().push(change.slice());
        });

        propagator.notify(
            Change::CommittedVariables {
                key: ScopeKey::Workspace,
                environment: EnvironmentId::new("w"),
            },
            resolved("b.com"),
        );

        assert_eq!(
            order.borrow().as_slice(),
            &[StateSlice::CommittedVariables, StateSlice::ResolvedVariables]
        );
    }

    #[test]
    fn test_push_resolved_skips_subscribers_and_revision() {
        let ctx = RecordingContext::default();
        let mut propagator = ChangePropagator::new(Box::new(ctx.clone()));
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        propagator.subscribe(StateSlice::ResolvedVariables, move |_| {
            *counter.borrow_mut() += 1;
        });

        propagator.push_resolved(&resolved("a.com"));

        assert_eq!(ctx.pushes.borrow().len(), 1);
        assert_eq!(propagator.revision(), 0);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut propagator = ChangePropagator::new(Box::new(RecordingContext::default()));
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = propagator.subscribe(StateSlice::ResolvedVariables, move |_| {
            *counter.borrow_mut() += 1;
        });

        assert!(propagator.unsubscribe(id));
        assert!(!propagator.unsubscribe(id));
        propagator.notify(selection_change(), resolved("a.com"));

        assert_eq!(*hits.borrow(), 0);
        assert_eq!(propagator.subscriber_count(), 0);
    }
}
