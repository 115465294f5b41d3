//! Notifier adapter that reports alerts through `tracing`.

use envscope_application::ports::Notifier;
use tracing::warn;

/// Logs user alerts as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Creates a new tracing notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        warn!(target: "envscope::alert", "{message}");
    }
}
