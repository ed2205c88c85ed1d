//! Persisted user preferences.
//!
//! Stores the theme choice in a small JSON file next to the config.

use crate::theme::Theme;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Preferences saved between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    /// "dark" or "light"
    theme: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default().as_str().to_string(),
        }
    }
}

impl Preferences {
    /// Load preferences from file.
    ///
    /// # Arguments
    /// * `path` - Path to preferences JSON file
    ///
    /// # Returns
    /// * `Result<Preferences>` - Loaded preferences or error
    ///
    /// # Details
    /// If the file doesn't exist, returns default preferences.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;

        let preferences: Preferences =
            serde_json::from_str(&content).with_context(|| "Failed to parse preferences file")?;

        Ok(preferences)
    }

    /// Save preferences to file.
    ///
    /// # Details
    /// Creates parent directory if it doesn't exist.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize preferences")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write preferences file: {}", path.display()))?;

        Ok(())
    }

    /// Stored theme; unknown values read as dark.
    pub fn theme(&self) -> Theme {
        Theme::parse(&self.theme)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme.as_str().to_string();
    }
}
