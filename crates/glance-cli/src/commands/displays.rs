//! `glance displays`

use glance_core::error::GlanceError;
use glance_core::DisplayInfo;

use crate::app::AppContext;

pub async fn run(ctx: &AppContext) -> Result<Vec<DisplayInfo>, GlanceError> {
    Ok(ctx.service()?.list_displays().await)
}
