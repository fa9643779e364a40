//! `glance screen`

use clap::Args;
use glance_core::error::GlanceError;
use glance_core::ScreenshotScreenRequest;

use super::{CaptureOutput, CaptureOutputArgs};
use crate::app::AppContext;

#[derive(Args, Debug, Clone, Default)]
pub struct ScreenArgs {
    /// Display id as printed by `glance displays` (default: primary)
    #[arg(long, value_name = "N")]
    pub display: Option<u32>,

    #[command(flatten)]
    pub output: CaptureOutputArgs,
}

pub async fn run(ctx: &AppContext, args: ScreenArgs) -> Result<CaptureOutput, GlanceError> {
    let request = ScreenshotScreenRequest {
        display_id: args.display,
        save_dir: ctx.save_dir(args.output.save_dir),
    };
    let result = ctx.service()?.screenshot_screen(request).await?;
    Ok(CaptureOutput::new(result, !args.output.no_image))
}
