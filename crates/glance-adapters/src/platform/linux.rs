//! Linux adapter
//!
//! Behavior depends on the display server, which is resolved on every call from
//! the configured preference and the session environment. Enumeration and capture
//! each walk their own tool chain; see `x11`, `wayland` and `capture`.

mod capture;
mod display_server;
mod wayland;
mod x11;

pub use display_server::DisplayServer;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use glance_core::config::DisplayServerPreference;
use glance_core::fallback::FallbackChain;
use glance_core::normalize::{normalize_displays, normalize_windows};
use glance_core::ports::environment::Environment;
use glance_core::ports::platform::{
    Bounds, CapturedImage, DisplayInfo, PlatformError, PlatformPort, WindowInfo,
};
use glance_core::ports::probe::CapabilityProbe;
use glance_core::ports::process::CommandRunner;
use tracing::{debug, warn};

use super::run_chain;
use crate::capture_file::capture_to_temp;
use capture::CaptureCommand;

/// Linux platform adapter (X11 and Wayland)
pub struct LinuxPlatform {
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn CapabilityProbe>,
    env: Arc<dyn Environment>,
    preference: DisplayServerPreference,
    temp_dir: PathBuf,
}

impl LinuxPlatform {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        probe: Arc<dyn CapabilityProbe>,
        env: Arc<dyn Environment>,
        preference: DisplayServerPreference,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            runner,
            probe,
            env,
            preference,
            temp_dir,
        }
    }

    /// The display server in effect right now
    pub fn display_server(&self) -> DisplayServer {
        display_server::resolve(self.preference, self.env.as_ref())
    }

    /// Walks a capture chain; whole-screen steps are flagged on the result
    async fn capture(&self, chain: FallbackChain<CaptureCommand>) -> Result<CapturedImage, PlatformError> {
        let runner = self.runner.as_ref();
        let temp_dir = self.temp_dir.as_path();

        run_chain(&chain, self.probe.as_ref(), |step| async move {
            let name = step.name;
            let exact = step.exact;
            let command = step.action;
            if !exact {
                warn!("{} cannot isolate the target; capturing the whole screen", name);
            }

            let data = capture_to_temp(temp_dir, |file| async move {
                capture::execute(runner, &command, &file).await
            })
            .await?;

            Ok(CapturedImage::new(data, name).whole_screen(!exact))
        })
        .await
    }
}

#[async_trait]
impl PlatformPort for LinuxPlatform {
    fn name(&self) -> &'static str {
        "linux"
    }

    async fn list_windows(&self) -> Vec<WindowInfo> {
        let server = self.display_server();
        debug!("Listing windows on {}", server);

        let windows = match server {
            DisplayServer::Wayland => {
                wayland::list_windows(self.runner.as_ref(), self.probe.as_ref()).await
            }
            DisplayServer::X11 | DisplayServer::Unknown => {
                x11::list_windows(self.runner.as_ref(), self.probe.as_ref()).await
            }
        };
        normalize_windows(windows)
    }

    async fn list_displays(&self) -> Vec<DisplayInfo> {
        let runner = self.runner.as_ref();
        let probe = self.probe.as_ref();

        if self.display_server() == DisplayServer::Wayland {
            match wayland::list_displays(runner, probe).await {
                Ok(displays) => return normalize_displays(displays),
                Err(e) => debug!("wlr-randr unusable ({}), trying xrandr", e),
            }
        }

        let displays = x11::list_displays(runner, probe).await.unwrap_or_else(|e| {
            warn!("Display query failed, using default display: {}", e);
            Vec::new()
        });
        normalize_displays(displays)
    }

    async fn screenshot_window(&self, window_id: &str) -> Result<CapturedImage, PlatformError> {
        let id = window_id.trim();
        if id.is_empty() || id.starts_with('-') || id.chars().any(char::is_whitespace) {
            return Err(PlatformError::InvalidTarget(format!(
                "'{}' is not an X window id",
                window_id
            )));
        }

        self.capture(capture::window_chain(self.display_server(), id))
            .await
    }

    async fn screenshot_screen(
        &self,
        display_id: Option<u32>,
    ) -> Result<CapturedImage, PlatformError> {
        let server = self.display_server();
        let displays = self.list_displays().await;
        let synthetic = displays.len() == 1 && displays[0].is_synthetic_default();

        let target = match display_id {
            Some(id) => match displays.iter().find(|d| d.id == id) {
                Some(display) => Some(display.bounds),
                None if synthetic => None,
                None => {
                    return Err(PlatformError::TargetNotFound(format!(
                        "Display {} not found. Use list_displays to see available displays.",
                        id
                    )))
                }
            },
            None if displays.len() > 1 => displays.iter().find(|d| d.primary).map(|d| d.bounds),
            None => None,
        };

        match target {
            Some(bounds) if !synthetic => {
                debug!("Capturing display bounds {:?}", bounds);
                self.capture(capture::region_chain(server, bounds)).await
            }
            _ => self.capture(capture::screen_chain(server)).await,
        }
    }

    async fn screenshot_region(&self, region: Bounds) -> Result<CapturedImage, PlatformError> {
        self.capture(capture::region_chain(self.display_server(), region))
            .await
    }
}
