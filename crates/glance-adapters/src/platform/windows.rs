//! Windows adapter
//!
//! All native work happens in PowerShell scripts (Win32 calls through `Add-Type`,
//! `System.Windows.Forms.Screen`, `System.Drawing`). Results come back as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use glance_core::fallback::FallbackChain;
use glance_core::normalize::{clamp_size, find_display, normalize_displays};
use glance_core::ports::platform::{
    Bounds, CapturedImage, DisplayInfo, PlatformError, PlatformPort, WindowInfo,
};
use glance_core::ports::probe::CapabilityProbe;
use glance_core::ports::process::CommandRunner;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{args, run_chain};
use crate::capture_file::capture_to_temp;

const LIST_WINDOWS_SCRIPT: &str = include_str!("../../scripts/windows/list_windows.ps1");
const LIST_DISPLAYS_SCRIPT: &str = include_str!("../../scripts/windows/list_displays.ps1");
const CAPTURE_WINDOW_SCRIPT: &str = include_str!("../../scripts/windows/capture_window.ps1");
const CAPTURE_RECT_SCRIPT: &str = include_str!("../../scripts/windows/capture_rect.ps1");

const POWERSHELL: &str = "powershell";

#[derive(Debug, Default, Deserialize)]
struct RawBounds {
    #[serde(default)]
    x: i64,
    #[serde(default)]
    y: i64,
    #[serde(default)]
    width: i64,
    #[serde(default)]
    height: i64,
}

impl RawBounds {
    fn to_bounds(&self) -> Bounds {
        Bounds::new(
            self.x as i32,
            self.y as i32,
            clamp_size(self.width),
            clamp_size(self.height),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawWindow {
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    app: Option<String>,
    #[serde(default)]
    bounds: RawBounds,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    bounds: RawBounds,
}

/// Parses `ConvertTo-Json` output as a list
///
/// PowerShell collapses a one-element pipeline to a bare object and an empty one
/// to nothing (or `null`).
fn parse_json_list<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, serde_json::Error> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(text)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(serde_json::from_value).collect(),
        single => Ok(vec![serde_json::from_value(single)?]),
    }
}

fn parse_windows(text: &str) -> Result<Vec<WindowInfo>, serde_json::Error> {
    let raw: Vec<RawWindow> = parse_json_list(text)?;

    Ok(raw
        .into_iter()
        .filter_map(|w| {
            let id = match w.id {
                Value::String(id) => id,
                Value::Number(id) => id.to_string(),
                _ => return None,
            };
            let bounds = w.bounds.to_bounds();
            if bounds.is_empty() {
                return None;
            }
            Some(WindowInfo {
                id,
                title: w.title.unwrap_or_default(),
                app: w.app.unwrap_or_default(),
                bounds,
            })
        })
        .collect())
}

fn parse_displays(text: &str) -> Result<Vec<DisplayInfo>, serde_json::Error> {
    let raw: Vec<RawDisplay> = parse_json_list(text)?;

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, d)| {
            let id = d.id.unwrap_or(index as u32 + 1);
            DisplayInfo {
                id,
                name: d.name.unwrap_or_else(|| format!("Display {}", id)),
                primary: d.primary,
                bounds: d.bounds.to_bounds(),
            }
        })
        .collect())
}

/// Quotes a string as a single-quoted PowerShell literal
fn ps_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn capture_window_script(handle: i64, output: &str) -> String {
    CAPTURE_WINDOW_SCRIPT
        .replace("__HANDLE__", &handle.to_string())
        .replace("__OUTPUT__", &ps_literal(output))
}

fn capture_rect_script(rect: Bounds, output: &str) -> String {
    CAPTURE_RECT_SCRIPT
        .replace("__X__", &rect.x.to_string())
        .replace("__Y__", &rect.y.to_string())
        .replace("__WIDTH__", &rect.width.to_string())
        .replace("__HEIGHT__", &rect.height.to_string())
        .replace("__OUTPUT__", &ps_literal(output))
}

/// Windows platform adapter
pub struct WindowsPlatform {
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn CapabilityProbe>,
    temp_dir: PathBuf,
}

impl WindowsPlatform {
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

    async fn powershell(&self, script: &str) -> Result<String, PlatformError> {
        let argv = args([
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
            script,
        ]);
        let output = self.runner.run(POWERSHELL, &argv).await?;
        Ok(output.stdout)
    }

    /// Runs a capture script built for a fresh temp file
    async fn capture<F>(&self, family: &'static str, build_script: F) -> Result<CapturedImage, PlatformError>
    where
        F: Fn(&str) -> String,
    {
        let chain = FallbackChain::new(family).then(POWERSHELL, &[POWERSHELL], ());
        let build_script = &build_script;

        let data = run_chain(&chain, self.probe.as_ref(), |_| async move {
            capture_to_temp(&self.temp_dir, |file| {
                let script = build_script(&file.arg());
                async move {
                    self.powershell(&script).await?;
                    Ok(())
                }
            })
            .await
        })
        .await?;

        Ok(CapturedImage::new(data, POWERSHELL))
    }
}

#[async_trait]
impl PlatformPort for WindowsPlatform {
    fn name(&self) -> &'static str {
        "windows"
    }

    async fn list_windows(&self) -> Vec<WindowInfo> {
        let output = match self.powershell(LIST_WINDOWS_SCRIPT).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Window enumeration failed: {}", e);
                return Vec::new();
            }
        };

        parse_windows(&output).unwrap_or_else(|e| {
            warn!("Unreadable window list: {}", e);
            Vec::new()
        })
    }

    async fn list_displays(&self) -> Vec<DisplayInfo> {
        let displays = match self.powershell(LIST_DISPLAYS_SCRIPT).await {
            Ok(output) => parse_displays(&output).unwrap_or_else(|e| {
                warn!("Unreadable display list: {}", e);
                Vec::new()
            }),
            Err(e) => {
                warn!("Display enumeration failed: {}", e);
                Vec::new()
            }
        };
        normalize_displays(displays)
    }

    async fn screenshot_window(&self, window_id: &str) -> Result<CapturedImage, PlatformError> {
        let handle: i64 = window_id.trim().parse().map_err(|_| {
            PlatformError::InvalidTarget(format!(
                "Windows window ids are decimal handles, got '{}'",
                window_id
            ))
        })?;

        debug!("Capturing window handle {}", handle);
        self.capture("window screenshot", |output| {
            capture_window_script(handle, output)
        })
        .await
    }

    async fn screenshot_screen(
        &self,
        display_id: Option<u32>,
    ) -> Result<CapturedImage, PlatformError> {
        let displays = self.list_displays().await;
        let target = find_display(&displays, display_id).ok_or_else(|| {
            PlatformError::TargetNotFound(format!(
                "Display {} not found. Use list_displays to see available displays.",
                display_id.unwrap_or_default()
            ))
        })?;

        let rect = target.bounds;
        debug!("Capturing display {} at {:?}", target.id, rect);
        self.capture("screen screenshot", move |output| capture_rect_script(rect, output))
            .await
    }

    async fn screenshot_region(&self, region: Bounds) -> Result<CapturedImage, PlatformError> {
        self.capture("region screenshot", move |output| {
            capture_rect_script(region, output)
        })
        .await
    }
}
