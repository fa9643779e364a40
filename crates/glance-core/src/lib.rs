//! glance core - window listing and screen capture domain
//!
//! This crate holds the shared data model, the port definitions, the platform
//! selector and the screenshot operations, following the Hexagonal Architecture
//! pattern. OS-specific code lives in `glance-adapters`.

pub mod config;
pub mod error;
pub mod fallback;
pub mod logging;
pub mod normalize;
pub mod ports;
pub mod selector;
pub mod service;
pub mod storage;

// Re-export primary types for convenient access
pub use config::{
    get_default_config_path, load_config, load_config_from_path, CaptureConfig, Config,
    DisplayServerPreference, LoggingConfig, PlatformConfig,
};
pub use error::{ConfigError, GlanceError, LoggerError, PlatformError, ProcessError};
pub use fallback::{FallbackChain, ToolStep};
pub use logging::{init_logger, LogLevel, LoggerConfig, LoggerGuard};
pub use ports::{
    Bounds, CapabilityProbe, CapturedImage, CommandOutput, CommandRunner, DisplayInfo,
    Environment, PlatformPort, WindowInfo,
};
pub use selector::{OsKind, PlatformFactory, PlatformSelector};
pub use service::{
    ScreenshotRegionRequest, ScreenshotResult, ScreenshotScreenRequest, ScreenshotService,
    ScreenshotWindowRequest,
};
pub use storage::{decode_data_url, save_capture, to_data_url};
