//! Platform port definition
//!
//! The uniform capability contract every OS adapter satisfies, together with the
//! shared data model the adapters normalize their raw output into.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::process::ProcessError;

/// Width of the synthetic default display
pub const DEFAULT_DISPLAY_WIDTH: u32 = 1920;

/// Height of the synthetic default display
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 1080;

/// Name of the synthetic default display
pub const DEFAULT_DISPLAY_NAME: &str = "Main Display";

/// A rectangle in the native coordinate space of the OS display layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true for degenerate (invisible) rectangles
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An on-screen window
///
/// `id` is an opaque handle, meaningful only to the adapter that produced it and
/// only for the lifetime of the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: String,
    pub title: String,
    pub app: String,
    pub bounds: Bounds,
}

/// An attached display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    /// 1-based ordinal, stable only within one enumeration
    pub id: u32,
    pub name: String,
    pub primary: bool,
    pub bounds: Bounds,
}

impl DisplayInfo {
    /// The stand-in returned when no real display data can be obtained
    pub fn synthetic_default() -> Self {
        Self {
            id: 1,
            name: DEFAULT_DISPLAY_NAME.to_string(),
            primary: true,
            bounds: Bounds::new(0, 0, DEFAULT_DISPLAY_WIDTH, DEFAULT_DISPLAY_HEIGHT),
        }
    }

    /// Whether this entry is the synthetic default rather than real hardware data
    pub fn is_synthetic_default(&self) -> bool {
        *self == Self::synthetic_default()
    }
}

/// PNG bytes produced by a capture primitive
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Raw PNG image data
    pub data: Vec<u8>,
    /// Native tool that produced the image
    pub tool: String,
    /// True when a fallback tool captured the whole screen instead of the target
    pub whole_screen: bool,
}

impl CapturedImage {
    pub fn new(data: Vec<u8>, tool: impl Into<String>) -> Self {
        Self {
            data,
            tool: tool.into(),
            whole_screen: false,
        }
    }

    /// Marks the image as a whole-screen substitute for the requested target
    pub fn whole_screen(mut self, whole_screen: bool) -> Self {
        self.whole_screen = whole_screen;
        self
    }

    /// Pixel dimensions read from the PNG header, if the data is a readable PNG
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let decoder = png::Decoder::new(self.data.as_slice());
        let reader = decoder.read_info().ok()?;
        let info = reader.info();
        Some((info.width, info.height))
    }
}

/// Errors that can occur during platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    /// No adapter exists for the running operating system
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Every tool in a fallback chain is missing
    #[error("No {family} tool available. Install one of: {tools}")]
    ToolUnavailable { family: String, tools: String },

    /// The requested window or display does not exist
    #[error("{0}")]
    TargetNotFound(String),

    /// Neither a window id nor a window title was supplied
    #[error("Either window_id or window_title must be provided. Use list_windows to see available windows.")]
    MissingIdentifier,

    /// A native tool ran but failed or produced unusable output
    #[error("External tool failure: {0}")]
    ExternalToolFailure(String),

    /// A target argument is malformed
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// IO error while handling capture files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlatformError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PlatformError::UnsupportedPlatform(_) => "unsupported_platform",
            PlatformError::ToolUnavailable { .. } => "tool_unavailable",
            PlatformError::TargetNotFound(_) => "target_not_found",
            PlatformError::MissingIdentifier => "missing_identifier",
            PlatformError::ExternalToolFailure(_) => "external_tool_failure",
            PlatformError::InvalidTarget(_) => "invalid_target",
            PlatformError::Io(_) => "io",
        }
    }
}

impl From<ProcessError> for PlatformError {
    fn from(err: ProcessError) -> Self {
        PlatformError::ExternalToolFailure(err.to_string())
    }
}

/// Port for window/display enumeration and screen capture
///
/// Enumeration never fails: adapters degrade to an empty list or the synthetic
/// default display. Capture failures propagate since there is no safe default image.
#[async_trait]
pub trait PlatformPort: Send + Sync {
    /// Short adapter name used in diagnostics
    fn name(&self) -> &'static str;

    /// List visible top-level windows
    async fn list_windows(&self) -> Vec<WindowInfo>;

    /// List attached displays (never empty)
    async fn list_displays(&self) -> Vec<DisplayInfo>;

    /// Capture a single window by its opaque handle
    async fn screenshot_window(&self, window_id: &str) -> Result<CapturedImage, PlatformError>;

    /// Capture a display, or the primary display when `display_id` is `None`
    async fn screenshot_screen(&self, display_id: Option<u32>)
        -> Result<CapturedImage, PlatformError>;

    /// Capture an arbitrary rectangle of the virtual screen
    async fn screenshot_region(&self, region: Bounds) -> Result<CapturedImage, PlatformError>;
}
