//! Common error types for glance
//!
//! Port-specific errors live beside their ports and are re-exported here together
//! with the top-level `GlanceError`.

use thiserror::Error;

pub use crate::logging::LoggerError;
pub use crate::ports::platform::PlatformError;
pub use crate::ports::process::ProcessError;

/// Top-level error type for glance operations
#[derive(Debug, Error)]
pub enum GlanceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Window, display and capture errors
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Logger errors
    #[error("Logger error: {0}")]
    Logger(#[from] LoggerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GlanceError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            GlanceError::Config(_) => "config",
            GlanceError::Platform(err) => err.kind(),
            GlanceError::Logger(_) => "logger",
            GlanceError::Io(_) => "io",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Parse error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
