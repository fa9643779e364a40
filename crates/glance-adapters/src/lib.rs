//! glance adapters - native-tool implementations of the glance-core ports
//!
//! Provides the process runner, PATH probe and environment reader, the macOS,
//! Windows and Linux platform adapters, and the factory the platform selector uses
//! to build the adapter for the running OS.

pub mod capture_file;
pub mod environment;
pub mod factory;
pub mod platform;
pub mod probe;
pub mod runner;

#[cfg(test)]
mod testing;

// Re-export primary adapter types
pub use environment::SystemEnvironment;
pub use factory::{native_factory, system_factory, AdapterOptions};
pub use platform::{LinuxPlatform, MacOsPlatform, WindowsPlatform};
pub use probe::PathProbe;
pub use runner::TokioCommandRunner;
