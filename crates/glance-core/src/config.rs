//! Configuration management for glance
//!
//! Handles loading and validation of `~/.glance/config.toml`.

use crate::error::ConfigError;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Capture configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Default save directory when a request does not name one
    #[serde(
        default,
        deserialize_with = "deserialize_optional_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub save_dir: Option<PathBuf>,

    /// Directory for temporary capture files (default: system temp dir)
    #[serde(
        default,
        deserialize_with = "deserialize_optional_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub temp_dir: Option<PathBuf>,
}

/// Platform adapter configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Linux display server: "auto", "x11" or "wayland"
    #[serde(default = "default_display_server")]
    pub display_server: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            display_server: default_display_server(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// "error", "warn", "info", "debug" or "trace"
    #[serde(default = "default_level")]
    pub level: String,

    /// Mirror log lines to stderr
    #[serde(default)]
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            stderr: false,
        }
    }
}

/// How the Linux adapter picks its display server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayServerPreference {
    /// Detect from the session environment
    #[default]
    Auto,
    X11,
    Wayland,
}

impl std::str::FromStr for DisplayServerPreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DisplayServerPreference::Auto),
            "x11" => Ok(DisplayServerPreference::X11),
            "wayland" => Ok(DisplayServerPreference::Wayland),
            other => Err(ConfigError::InvalidValue(format!(
                "display_server must be 'auto', 'x11' or 'wayland', got '{}'",
                other
            ))),
        }
    }
}

fn default_display_server() -> String {
    "auto".to_string()
}

fn default_level() -> String {
    LogLevel::Info.to_string()
}

/// Expands a leading tilde (~) to the home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    path.to_path_buf()
}

fn deserialize_optional_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| expand_tilde(Path::new(&s))))
}

impl Config {
    /// Validates the configuration values
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if:
    /// - `platform.display_server` is not "auto", "x11" or "wayland"
    /// - `logging.level` is not a known log level
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.display_server()?;
        self.log_level()?;
        Ok(())
    }

    /// Parsed `platform.display_server`
    pub fn display_server(&self) -> Result<DisplayServerPreference, ConfigError> {
        self.platform.display_server.parse()
    }

    /// Parsed `logging.level`
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.logging
            .level
            .parse::<LogLevel>()
            .map_err(|e| ConfigError::InvalidValue(format!("logging.level: {}", e)))
    }
}

/// Returns the default configuration file path (`~/.glance/config.toml`)
pub fn get_default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".glance")
        .join("config.toml")
}

/// Loads configuration from the specified path
///
/// If the file doesn't exist, a default configuration file is written.
/// If the file is invalid or contains invalid values, defaults are returned.
///
/// # Errors
/// Only for IO errors while reading or creating the file
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = Config::default();
        let toml_str = toml::to_string_pretty(&default_config)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, &toml_str)?;

        tracing::info!("Created default configuration file at {:?}", path);
        return Ok(default_config);
    }

    let content = fs::read_to_string(path)?;

    let config: Config = match toml::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                "Failed to parse configuration file {:?}: {}. Using default configuration.",
                path,
                e
            );
            return Ok(Config::default());
        }
    };

    if let Err(e) = config.validate() {
        tracing::warn!(
            "Invalid configuration in {:?}: {}. Using default configuration.",
            path,
            e
        );
        return Ok(Config::default());
    }

    Ok(config)
}

/// Loads configuration from the default path (`~/.glance/config.toml`)
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from_path(&get_default_config_path())
}
