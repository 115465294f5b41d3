//! Adapters for the collaborator ports.

mod in_memory_execution;
mod tracing_notifier;

pub use in_memory_execution::InMemoryExecutionContext;
pub use tracing_notifier::TracingNotifier;
