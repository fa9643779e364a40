//! `glance window`

use clap::Args;
use glance_core::error::GlanceError;
use glance_core::ScreenshotWindowRequest;
use tracing::debug;

use super::{CaptureOutput, CaptureOutputArgs};
use crate::app::AppContext;

#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Window id as printed by `glance windows`
    #[arg(long)]
    pub id: Option<String>,

    /// Case-insensitive title substring; the first matching window is captured
    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub output: CaptureOutputArgs,
}

pub async fn run(ctx: &AppContext, args: WindowArgs) -> Result<CaptureOutput, GlanceError> {
    debug!("window capture: id={:?} title={:?}", args.id, args.title);

    let request = ScreenshotWindowRequest {
        window_id: args.id,
        window_title: args.title,
        save_dir: ctx.save_dir(args.output.save_dir),
    };
    let result = ctx.service()?.screenshot_window(request).await?;
    Ok(CaptureOutput::new(result, !args.output.no_image))
}
