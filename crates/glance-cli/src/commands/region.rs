//! `glance region`

use clap::Args;
use glance_core::error::GlanceError;
use glance_core::ScreenshotRegionRequest;

use super::{CaptureOutput, CaptureOutputArgs};
use crate::app::AppContext;

#[derive(Args, Debug, Clone)]
pub struct RegionArgs {
    /// Left edge in virtual-screen coordinates
    pub x: i32,
    /// Top edge in virtual-screen coordinates
    pub y: i32,
    pub width: u32,
    pub height: u32,

    #[command(flatten)]
    pub output: CaptureOutputArgs,
}

pub async fn run(ctx: &AppContext, args: RegionArgs) -> Result<CaptureOutput, GlanceError> {
    let request = ScreenshotRegionRequest {
        x: args.x,
        y: args.y,
        width: args.width,
        height: args.height,
        save_dir: ctx.save_dir(args.output.save_dir),
    };
    let result = ctx.service()?.screenshot_region(request).await?;
    Ok(CaptureOutput::new(result, !args.output.no_image))
}
