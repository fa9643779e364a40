//! X11 window and display enumeration
//!
//! Windows come from `xdotool` (one query per window) or, failing that, the
//! fixed-column listing of `wmctrl -l -G`. Displays come from `xrandr --query`.

use glance_core::fallback::FallbackChain;
use glance_core::normalize::{parse_coord, parse_size};
use glance_core::ports::platform::{Bounds, DisplayInfo, PlatformError, WindowInfo};
use glance_core::ports::probe::CapabilityProbe;
use glance_core::ports::process::CommandRunner;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::platform::{args, run_chain};

static POSITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"Position:\s*(-?\d+),(-?\d+)").unwrap());
static GEOMETRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"Geometry:\s*(\d+)x(\d+)").unwrap());
static XRANDR_OUTPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\S+)\s+connected\s*(primary)?\s*(\d+)x(\d+)\+(\d+)\+(\d+)").unwrap()
});

/// Minimum whitespace-separated fields of a `wmctrl -l -G` line
const WMCTRL_MIN_FIELDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowLister {
    Xdotool,
    Wmctrl,
}

pub(crate) fn window_chain() -> FallbackChain<WindowLister> {
    FallbackChain::new("window listing")
        .then("xdotool", &["xdotool"], WindowLister::Xdotool)
        .then("wmctrl", &["wmctrl"], WindowLister::Wmctrl)
}

/// Reads `Position: x,y` and `Geometry: WxH`; missing parts are 0
pub(crate) fn parse_geometry(text: &str) -> Bounds {
    let (x, y) = POSITION
        .captures(text)
        .map(|c| (parse_coord(&c[1]), parse_coord(&c[2])))
        .unwrap_or((0, 0));
    let (width, height) = GEOMETRY
        .captures(text)
        .map(|c| (parse_size(&c[1]), parse_size(&c[2])))
        .unwrap_or((0, 0));
    Bounds::new(x, y, width, height)
}

/// Parses `wmctrl -l -G`: id, desktop, x, y, width, height, host, title...
pub(crate) fn parse_wmctrl(text: &str) -> Vec<WindowInfo> {
    text.lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < WMCTRL_MIN_FIELDS {
                return None;
            }
            Some(WindowInfo {
                id: fields[0].to_string(),
                title: fields[7..].join(" "),
                app: String::new(),
                bounds: Bounds::new(
                    parse_coord(fields[2]),
                    parse_coord(fields[3]),
                    parse_size(fields[4]),
                    parse_size(fields[5]),
                ),
            })
        })
        .collect()
}

/// Parses `xrandr --query`, numbering connected outputs in report order
pub(crate) fn parse_xrandr(text: &str) -> Vec<DisplayInfo> {
    XRANDR_OUTPUT
        .captures_iter(text)
        .enumerate()
        .map(|(index, c)| DisplayInfo {
            id: index as u32 + 1,
            name: c[1].to_string(),
            primary: c.get(2).is_some(),
            bounds: Bounds::new(
                parse_coord(&c[5]),
                parse_coord(&c[6]),
                parse_size(&c[3]),
                parse_size(&c[4]),
            ),
        })
        .collect()
}

async fn run(runner: &dyn CommandRunner, program: &str, argv: &[&str]) -> Result<String, PlatformError> {
    Ok(runner.run(program, &args(argv.iter().copied())).await?.stdout)
}

async fn owning_process(runner: &dyn CommandRunner, window_id: &str) -> String {
    let pid = match run(runner, "xdotool", &["getwindowpid", window_id]).await {
        Ok(pid) => pid.trim().to_string(),
        Err(_) => return String::new(),
    };
    if pid.is_empty() || pid == "0" {
        return String::new();
    }

    run(runner, "ps", &["-p", pid.as_str(), "-o", "comm="])
        .await
        .map(|name| name.trim().to_string())
        .unwrap_or_default()
}

async fn list_with_xdotool(runner: &dyn CommandRunner) -> Result<Vec<WindowInfo>, PlatformError> {
    let ids = run(runner, "xdotool", &["search", "--onlyvisible", "--name", ""]).await?;

    let mut windows = Vec::new();
    for id in ids.lines().map(str::trim).filter(|id| !id.is_empty()) {
        let title = match run(runner, "xdotool", &["getwindowname", id]).await {
            Ok(title) => title,
            Err(e) => {
                debug!("Skipping window {}: {}", id, e);
                continue;
            }
        };
        let geometry = match run(runner, "xdotool", &["getwindowgeometry", id]).await {
            Ok(geometry) => geometry,
            Err(e) => {
                debug!("Skipping window {}: {}", id, e);
                continue;
            }
        };

        windows.push(WindowInfo {
            id: id.to_string(),
            title: title.trim().to_string(),
            app: owning_process(runner, id).await,
            bounds: parse_geometry(&geometry),
        });
    }
    Ok(windows)
}

async fn list_with_wmctrl(runner: &dyn CommandRunner) -> Result<Vec<WindowInfo>, PlatformError> {
    Ok(parse_wmctrl(&run(runner, "wmctrl", &["-l", "-G"]).await?))
}

/// Lists X11 windows; empty (with a warning) when no listing tool works
pub(crate) async fn list_windows(
    runner: &dyn CommandRunner,
    probe: &dyn CapabilityProbe,
) -> Vec<WindowInfo> {
    let result = run_chain(&window_chain(), probe, |step| async move {
        match step.action {
            WindowLister::Xdotool => list_with_xdotool(runner).await,
            WindowLister::Wmctrl => list_with_wmctrl(runner).await,
        }
    })
    .await;

    result.unwrap_or_else(|e| {
        warn!("No window listing tool available ({}). Install xdotool or wmctrl.", e);
        Vec::new()
    })
}

/// Lists X11 outputs via xrandr
///
/// # Errors
/// `ToolUnavailable` without xrandr, `ExternalToolFailure` when it fails or
/// reports no connected output
pub(crate) async fn list_displays(
    runner: &dyn CommandRunner,
    probe: &dyn CapabilityProbe,
) -> Result<Vec<DisplayInfo>, PlatformError> {
    let chain = FallbackChain::new("display listing").then("xrandr", &["xrandr"], ());

    run_chain(&chain, probe, |_| async move {
        let displays = parse_xrandr(&run(runner, "xrandr", &["--query"]).await?);
        if displays.is_empty() {
            return Err(PlatformError::ExternalToolFailure(
                "xrandr reported no connected outputs".to_string(),
            ));
        }
        Ok(displays)
    })
    .await
}
