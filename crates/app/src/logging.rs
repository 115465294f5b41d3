//! Tracing subscriber setup.

use envscope_domain::LogLevel;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the configured log level.
pub const LOG_ENV: &str = "ENVSCOPE_LOG";

/// Picks the log level: `ENVSCOPE_LOG` when it names a level, else the configured one.
#[must_use]
pub fn effective_level(configured: LogLevel, override_value: Option<&str>) -> LogLevel {
    override_value
        .and_then(LogLevel::parse)
        .unwrap_or(configured)
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level from [`effective_level`] applies.
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init(configured: LogLevel) {
    let level = effective_level(configured, std::env::var(LOG_ENV).ok().as_deref());
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter())))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
