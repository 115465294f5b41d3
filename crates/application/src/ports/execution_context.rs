//! Execution context port
//!
//! The request-execution collaborator that substitutes `{{variable}}` tokens.

use envscope_domain::ResolvedVariables;

/// Receives the resolved variables used by subsequently issued requests and previews.
///
/// The core never reads anything back. Implementations must not fail loudly: a
/// committed change is never rolled back because a consumer misbehaved.
pub trait ExecutionContext {
    /// Replaces the variables the execution engine substitutes.
    fn push_resolved_variables(&self, variables: &ResolvedVariables);
}
