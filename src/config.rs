//! Configuration management for the GitHub activity dashboard.
//!
//! Handles loading and saving configuration from JSONC files.
//! Manages the API token, endpoint settings and file locations.

use crate::metrics::{DEFAULT_WINDOW_MONTHS, MAX_WINDOW_MONTHS};
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the platform config dir.
const APP_DIR: &str = "gh-activity-tui";

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Application configuration structure.
///
/// Contains API credentials and user preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub personal access token
    pub github_token: Option<String>,
    /// Base URL of the GitHub REST API
    pub api_base_url: String,
    /// Items requested per endpoint (GitHub caps this at 100)
    pub per_page: u32,
    /// Number of calendar months shown in the analytics tab
    pub metrics_window_months: u32,
    /// Tab shown at startup (e.g. "pulls", "issues", "repos")
    pub default_tab: String,
    /// Initial sort of the list tabs that offer it ("newest", "oldest", "az", "za", "stars")
    pub default_sort: String,
    /// Preferences file path (relative to config dir or absolute)
    pub preferences_path: String,
    /// Log file path (relative to config dir or absolute)
    pub log_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_base_url: "https://api.github.com".to_string(),
            per_page: 100,
            metrics_window_months: DEFAULT_WINDOW_MONTHS,
            default_tab: "pulls".to_string(),
            default_sort: "newest".to_string(),
            preferences_path: "preferences.json".to_string(),
            log_path: "gh-activity-tui.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    ///
    /// # Details
    /// Searches for config file in:
    /// 1. Provided path (if given)
    /// 2. `$XDG_CONFIG_HOME/gh-activity-tui/config.jsonc`
    /// 3. `~/.config/gh-activity-tui/config.jsonc`
    ///
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = serde_json::from_str(&strip_line_comments(&content))
            .with_context(|| "Failed to deserialize config")?;

        Ok(config.normalized())
    }

    /// Save configuration to file.
    ///
    /// # Arguments
    /// * `path` - Optional path to config file. If None, uses default location.
    ///
    /// # Details
    /// Creates config directory if it doesn't exist.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_config_path()?
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, json)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get default configuration file path.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - `$XDG_CONFIG_HOME/gh-activity-tui/config.jsonc` or error
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(app_config_dir()?.join("config.jsonc"))
    }

    /// Get preferences file path.
    pub fn preferences_file_path(&self) -> Result<PathBuf> {
        resolve_in_config_dir(&self.preferences_path)
    }

    /// Get log file path.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        resolve_in_config_dir(&self.log_path)
    }

    /// Pick the token to authenticate with.
    ///
    /// # Arguments
    /// * `env_token` - Value of `GITHUB_TOKEN`, if set
    ///
    /// # Details
    /// A non-empty configured token wins; otherwise the environment value is used.
    pub fn resolve_token(&self, env_token: Option<String>) -> Option<String> {
        self.github_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env_token.filter(|t| !t.trim().is_empty()))
    }

    /// Clamp numeric settings into the ranges the API and the charts accept.
    fn normalized(mut self) -> Self {
        self.per_page = self.per_page.clamp(1, 100);
        self.metrics_window_months = self.metrics_window_months.clamp(1, MAX_WINDOW_MONTHS);
        self
    }
}

/// Strip `//` line comments that are not inside a string.
fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if let Some(comment_pos) = line.find("//") {
                // Simplified string detection: escaped quotes are not handled
                let quote_count = line[..comment_pos].matches('"').count();
                if quote_count % 2 == 0 {
                    line[..comment_pos].trim_end()
                } else {
                    line
                }
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn app_config_dir() -> Result<PathBuf> {
    let config_dir =
        config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;
    Ok(config_dir.join(APP_DIR))
}

fn resolve_in_config_dir(path: &str) -> Result<PathBuf> {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        Ok(candidate.to_path_buf())
    } else {
        Ok(app_config_dir()?.join(candidate))
    }
}
