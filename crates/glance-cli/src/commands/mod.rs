//! CLI command implementations
//!
//! Each subcommand has its own module. Commands return a serializable value;
//! `output::render` prints it.

pub mod displays;
pub mod region;
pub mod screen;
pub mod window;
pub mod windows;

use std::path::PathBuf;

use clap::Args;
use glance_core::ScreenshotResult;
use serde::Serialize;

/// Options shared by every capture command
#[derive(Args, Debug, Clone, Default)]
pub struct CaptureOutputArgs {
    /// Also save the PNG under <DIR>/<YYYY-MM-DD>/
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Leave the base64 image out of the printed result
    #[arg(long)]
    pub no_image: bool,
}

/// Printed form of a capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_path: Option<PathBuf>,
}

impl CaptureOutput {
    pub fn new(result: ScreenshotResult, include_image: bool) -> Self {
        Self {
            image: include_image.then_some(result.image),
            saved_path: result.saved_path,
        }
    }
}
