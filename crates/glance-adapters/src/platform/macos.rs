//! macOS adapter
//!
//! Windows and displays are queried by small Swift programs run through the `swift`
//! interpreter (CoreGraphics window list, `NSScreen.screens`). Captures use
//! `screencapture`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use glance_core::fallback::FallbackChain;
use glance_core::normalize::{clamp_size, normalize_displays};
use glance_core::ports::platform::{
    Bounds, CapturedImage, DisplayInfo, PlatformError, PlatformPort, WindowInfo,
};
use glance_core::ports::probe::CapabilityProbe;
use glance_core::ports::process::CommandRunner;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{args, run_chain};
use crate::capture_file::capture_to_temp;

const LIST_WINDOWS_SCRIPT: &str = include_str!("../../scripts/macos/list_windows.swift");
const LIST_DISPLAYS_SCRIPT: &str = include_str!("../../scripts/macos/list_displays.swift");

/// Compositing layer of normal application windows
const NORMAL_WINDOW_LAYER: i64 = 0;

#[derive(Debug, Deserialize)]
struct RawWindow {
    layer: Option<i64>,
    owner: Option<String>,
    number: Option<i64>,
    name: Option<String>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

#[derive(Debug, Deserialize)]
struct RawScreen {
    #[serde(default)]
    name: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

fn bounds_from(x: f64, y: f64, width: f64, height: f64) -> Bounds {
    Bounds::new(
        x as i32,
        y as i32,
        clamp_size(width as i64),
        clamp_size(height as i64),
    )
}

/// Keeps layer-0 windows that have both an owner and a window number
fn parse_windows(json: &str) -> Result<Vec<WindowInfo>, serde_json::Error> {
    let raw: Vec<RawWindow> = serde_json::from_str(json.trim())?;

    Ok(raw
        .into_iter()
        .filter(|w| w.layer == Some(NORMAL_WINDOW_LAYER))
        .filter_map(|w| {
            let owner = w.owner?;
            let number = w.number?;
            Some(WindowInfo {
                id: number.to_string(),
                title: w.name.unwrap_or_default(),
                app: owner,
                bounds: bounds_from(w.x, w.y, w.width, w.height),
            })
        })
        .collect())
}

/// Numbers screens from 1; the first enumerated screen is primary
fn parse_displays(json: &str) -> Result<Vec<DisplayInfo>, serde_json::Error> {
    let raw: Vec<RawScreen> = serde_json::from_str(json.trim())?;

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, screen)| DisplayInfo {
            id: index as u32 + 1,
            name: if screen.name.is_empty() {
                format!("Display {}", index + 1)
            } else {
                screen.name
            },
            primary: index == 0,
            bounds: bounds_from(screen.x, screen.y, screen.width, screen.height),
        })
        .collect())
}

/// macOS platform adapter
pub struct MacOsPlatform {
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn CapabilityProbe>,
    temp_dir: PathBuf,
}

impl MacOsPlatform {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        probe: Arc<dyn CapabilityProbe>,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            runner,
            probe,
            temp_dir,
        }
    }

    /// Runs an embedded Swift program and returns what it printed
    ///
    /// Each call gets its own script file, removed when the run finishes.
    async fn run_swift(&self, name: &str, source: &str) -> Result<String, PlatformError> {
        let script = tempfile::Builder::new()
            .prefix(&format!("glance-{}-", name))
            .suffix(".swift")
            .tempfile_in(&self.temp_dir)?;
        tokio::fs::write(script.path(), source).await?;

        let output = self
            .runner
            .run("swift", &args([script.path().to_string_lossy()]))
            .await?;

        Ok(output.stdout)
    }

    async fn screencapture(
        &self,
        family: &'static str,
        target: Vec<String>,
    ) -> Result<CapturedImage, PlatformError> {
        let chain = FallbackChain::new(family).then("screencapture", &["screencapture"], ());

        let data = run_chain(&chain, self.probe.as_ref(), |_| {
            let target = target.clone();
            async move {
                capture_to_temp(&self.temp_dir, |file| {
                    let mut argv = target;
                    // -o: no window shadow, -x: no shutter sound
                    argv.extend(args(["-o", "-x"]));
                    argv.push(file.arg());
                    async move {
                        self.runner.run("screencapture", &argv).await?;
                        Ok(())
                    }
                })
                .await
            }
        })
        .await?;

        Ok(CapturedImage::new(data, "screencapture"))
    }
}

#[async_trait]
impl PlatformPort for MacOsPlatform {
    fn name(&self) -> &'static str {
        "macos"
    }

    async fn list_windows(&self) -> Vec<WindowInfo> {
        let output = match self.run_swift("list-windows", LIST_WINDOWS_SCRIPT).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Window query failed: {}", e);
                return Vec::new();
            }
        };

        parse_windows(&output).unwrap_or_else(|e| {
            warn!("Unreadable window list: {}", e);
            Vec::new()
        })
    }

    async fn list_displays(&self) -> Vec<DisplayInfo> {
        let displays = match self.run_swift("list-displays", LIST_DISPLAYS_SCRIPT).await {
            Ok(output) => parse_displays(&output).unwrap_or_else(|e| {
                warn!("Unreadable display list: {}", e);
                Vec::new()
            }),
            Err(e) => {
                warn!("Display query failed: {}", e);
                Vec::new()
            }
        };
        normalize_displays(displays)
    }

    async fn screenshot_window(&self, window_id: &str) -> Result<CapturedImage, PlatformError> {
        let number: u32 = window_id.trim().parse().map_err(|_| {
            PlatformError::InvalidTarget(format!(
                "macOS window ids are window numbers, got '{}'",
                window_id
            ))
        })?;

        debug!("Capturing window {}", number);
        self.screencapture("window screenshot", args(["-l".to_string(), number.to_string()]))
            .await
    }

    async fn screenshot_screen(
        &self,
        display_id: Option<u32>,
    ) -> Result<CapturedImage, PlatformError> {
        let Some(id) = display_id else {
            return self.screencapture("screen screenshot", Vec::new()).await;
        };

        let displays = self.list_displays().await;
        let known = displays.iter().any(|d| d.id == id);
        let synthetic = displays.len() == 1 && displays[0].is_synthetic_default();
        if !known && !synthetic {
            return Err(PlatformError::TargetNotFound(format!(
                "Display {} not found. Use list_displays to see available displays.",
                id
            )));
        }

        self.screencapture("screen screenshot", args(["-D".to_string(), id.to_string()]))
            .await
    }

    async fn screenshot_region(&self, region: Bounds) -> Result<CapturedImage, PlatformError> {
        let rect = format!(
            "{},{},{},{}",
            region.x, region.y, region.width, region.height
        );
        self.screencapture("region screenshot", args(["-R".to_string(), rect]))
            .await
    }
}
