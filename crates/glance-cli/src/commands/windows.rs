//! `glance windows`

use glance_core::error::GlanceError;
use glance_core::WindowInfo;

use crate::app::AppContext;

pub async fn run(ctx: &AppContext) -> Result<Vec<WindowInfo>, GlanceError> {
    Ok(ctx.service()?.list_windows().await)
}
