//! Execution context adapter that keeps the latest push in memory.

use std::cell::RefCell;
use std::rc::Rc;

use envscope_application::ports::ExecutionContext;
use envscope_domain::ResolvedVariables;
use tracing::trace;

/// Holds the most recently pushed variables.
///
/// Clones share the same slot, so one clone can be handed to the workbench while
/// another is kept to read what was pushed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutionContext {
    latest: Rc<RefCell<Option<ResolvedVariables>>>,
    pushes: Rc<RefCell<u64>>,
}

impl InMemoryExecutionContext {
    /// Creates an empty execution context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variables of the last push, if any.
    #[must_use]
    pub fn latest(&self) -> Option<ResolvedVariables> {
        self.latest.borrow().clone()
    }

    /// Number of pushes received.
    #[must_use]
    pub fn push_count(&self) -> u64 {
        *self.pushes.borrow()
    }
}

impl ExecutionContext for InMemoryExecutionContext {
    fn push_resolved_variables(&self, variables: &ResolvedVariables) {
        trace!(count = variables.len(), "Execution context updated");
        *self.latest.borrow_mut() = Some(variables.clone());
        *self.pushes.borrow_mut() += 1;
    }
}
