//! Configuration management for devconsole.
//!
//! Handles loading console settings and the local caller's identity from a
//! TOML file.

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::command::OPERATOR_PERMISSION;

/// Main configuration structure for devconsole.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Dispatch settings.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// The caller that runs commands typed locally.
    #[serde(default)]
    pub caller: CallerConfig,
}

/// Dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Whether this console runs on the authoritative side. Server-only
    /// commands typed on a non-authoritative console are forwarded.
    #[serde(default = "default_authority")]
    pub authority: bool,

    /// Maximum number of completion candidates returned.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_authority() -> bool {
    true
}

fn default_max_suggestions() -> usize {
    32
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            authority: default_authority(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

/// Identity and permissions of the local caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerConfig {
    /// Display name.
    #[serde(default = "default_caller_name")]
    pub name: String,

    /// Permissions granted to the caller.
    #[serde(default = "default_permissions")]
    pub permissions: Vec<String>,
}

fn default_caller_name() -> String {
    "local".to_string()
}

fn default_permissions() -> Vec<String> {
    vec![OPERATOR_PERMISSION.to_string()]
}

impl Default for CallerConfig {
    fn default() -> Self {
        Self {
            name: default_caller_name(),
            permissions: default_permissions(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("devconsole")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ConsoleError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
