//! Workbench Settings Domain Model
//!
//! Defines the configurable behavior of the environment workbench.

use serde::{Deserialize, Serialize};

use crate::environment::DEFAULT_INDENT;

/// Widest indentation accepted for drafts.
pub const MAX_INDENT: usize = 8;

/// Log verbosity preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// General information (default).
    #[default]
    Info,
    /// Session lifecycle and context switches.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Returns the directive understood by an env-filter.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Parses a level name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

/// Settings for the environment workbench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbenchSettings {
    /// Spaces per indentation level in serialized drafts.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Alert shown when a draft cannot be committed because it is not valid JSON.
    #[serde(default = "default_invalid_format_message")]
    pub invalid_format_message: String,

    /// Log verbosity.
    #[serde(default)]
    pub log_level: LogLevel,
}

const fn default_indent_width() -> usize {
    DEFAULT_INDENT
}

fn default_invalid_format_message() -> String {
    "The variables are not valid JSON.".to_string()
}

impl WorkbenchSettings {
    /// Returns the indentation to use, clamped to `1..=MAX_INDENT`.
    #[must_use]
    pub fn indent(&self) -> usize {
        self.indent_width.clamp(1, MAX_INDENT)
    }
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            invalid_format_message: default_invalid_format_message(),
            log_level: LogLevel::default(),
        }
    }
}
