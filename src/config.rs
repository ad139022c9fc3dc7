//! Configuration handling
//!
//! Configuration is stored in `config.toml` under the user config directory
//! (`~/.config/task-memory/config.toml` on Linux). Every field has a default,
//! so a missing file or section is never an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ListFilter, TaskStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Defaults for newly created tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDefaults {
    /// Status of a created task when none is given
    pub default_status: TaskStatus,

    /// Version stamped on a created task when none is given
    pub default_version: String,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            default_status: TaskStatus::Todo,
            default_version: "tbd".to_string(),
        }
    }
}

/// Listing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ListConfig {
    /// Which tasks a plain listing shows
    pub default_filter: ListFilter,
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub tasks: TaskDefaults,
    pub list: ListConfig,
}

impl Config {
    /// Returns the user config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "task-memory", "task-memory")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads configuration from the user config directory
    pub fn load() -> Result<Self> {
        match Self::config_dir() {
            Some(dir) => Self::from_path(&dir.join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a file, falling back to defaults if it is missing
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Parses and validates configuration text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot rule out on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks.default_version.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "tasks.default_version must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Writes the configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}
