//! Port definitions for Hexagonal Architecture
//!
//! These traits define the boundaries between the core domain and the OS-facing adapters.

pub mod environment;
pub mod platform;
pub mod probe;
pub mod process;

pub use environment::Environment;
pub use platform::{Bounds, CapturedImage, DisplayInfo, PlatformError, PlatformPort, WindowInfo};
pub use probe::CapabilityProbe;
pub use process::{CommandOutput, CommandRunner, ProcessError};
