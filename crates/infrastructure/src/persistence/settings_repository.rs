//! Workbench settings persistence.
//!
//! Stores settings in the platform-specific config directory:
//! - Linux: ~/.config/envscope/settings.json
//! - macOS: ~/Library/Application Support/envscope/settings.json
//! - Windows: %APPDATA%/envscope/settings.json

use std::path::PathBuf;

use envscope_domain::WorkbenchSettings;
use tokio::fs;

use crate::serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};

/// Error type for settings operations.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Could not determine config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Repository for workbench settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsRepository {
    path: Option<PathBuf>,
}

impl SettingsRepository {
    /// Creates a repository that uses the platform config directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { path: None }
    }

    /// Creates a repository for an explicit settings file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the path to the envscope config directory.
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("envscope"))
    }

    /// Returns the path where settings are stored, if available.
    #[must_use]
    pub fn settings_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| Self::config_dir().map(|p| p.join("settings.json")))
    }

    /// Loads settings from disk.
    ///
    /// Returns default settings if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<WorkbenchSettings, SettingsError> {
        let Some(path) = self.settings_path() else {
            return Ok(WorkbenchSettings::default());
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(WorkbenchSettings::default());
        }

        let content = fs::read(&path).await?;
        let settings = from_json_bytes(&content)?;
        Ok(settings)
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory is known or the file cannot be written.
    pub async fn save(&self, settings: &WorkbenchSettings) -> Result<(), SettingsError> {
        let path = self.settings_path().ok_or(SettingsError::NoConfigDir)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_stable_bytes(settings)?;
        fs::write(&path, content).await?;

        Ok(())
    }
}
