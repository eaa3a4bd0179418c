//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use crate::walker::CyclePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the diagram the tool looks for when none is given
pub const DEFAULT_DIAGRAM: &str = "Statemachine Diagram";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub walker: WalkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Project file to open; the bundled sample when unset
    pub model: Option<PathBuf>,

    /// Name of the diagram to render
    #[serde(default = "default_diagram")]
    pub diagram: String,
}

/// Walker settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WalkerConfig {
    /// Behavior on cyclic submachine nesting
    #[serde(default)]
    pub on_cycle: CyclePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_diagram() -> String {
    DEFAULT_DIAGRAM.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            model: None,
            diagram: default_diagram(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.state-diagram-walker/config.toml
    /// 3. /etc/state-diagram-walker/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("config.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".state-diagram-walker").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/state-diagram-walker/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}
