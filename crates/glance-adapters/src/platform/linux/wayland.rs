//! Wayland window and display enumeration
//!
//! Wayland does not let one client inspect another's windows. The only bridge
//! supported is GNOME Shell's `Eval` D-Bus method; other compositors get an empty
//! window list. Displays come from `wlr-randr` on wlroots compositors.

use glance_core::fallback::FallbackChain;
use glance_core::normalize::{clamp_size, parse_coord, parse_size};
use glance_core::ports::platform::{Bounds, DisplayInfo, PlatformError, WindowInfo};
use glance_core::ports::probe::CapabilityProbe;
use glance_core::ports::process::CommandRunner;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::platform::{args, run_chain};

/// JavaScript evaluated inside GNOME Shell
const GNOME_SHELL_WINDOWS_JS: &str = "global.get_window_actors().map(a => a.meta_window).map(w => { \
const r = w.get_frame_rect(); \
return { id: w.get_id(), title: w.get_title(), app: w.get_wm_class() || '', \
x: r.x, y: r.y, width: r.width, height: r.height }; })";

static EVAL_REPLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\(true,\s*'(.+)'\)").unwrap());
static WLR_MODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)x(\d+)\s+px,.*current").unwrap());
static WLR_POSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:Position:|\bat)\s+(-?\d+),\s*(-?\d+)").unwrap());

#[derive(Debug, Deserialize)]
struct ShellWindow {
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    app: Option<String>,
    #[serde(default)]
    x: i64,
    #[serde(default)]
    y: i64,
    #[serde(default)]
    width: i64,
    #[serde(default)]
    height: i64,
}

/// Extracts the window list from a `gdbus call ... Eval` reply
///
/// The reply looks like `(true, '[{"id":1,...}]')`; the payload is a GVariant
/// string literal with single quotes escaped.
pub(crate) fn parse_shell_eval(reply: &str) -> Result<Vec<WindowInfo>, PlatformError> {
    let payload = EVAL_REPLY
        .captures(reply)
        .and_then(|c| c.get(1))
        .ok_or_else(|| {
            PlatformError::ExternalToolFailure(format!(
                "GNOME Shell refused the window query: {}",
                reply.trim()
            ))
        })?
        .as_str()
        .replace("\\'", "'");

    let raw: Vec<ShellWindow> = serde_json::from_str(&payload).map_err(|e| {
        PlatformError::ExternalToolFailure(format!("unreadable GNOME Shell reply: {}", e))
    })?;

    Ok(raw
        .into_iter()
        .map(|w| WindowInfo {
            id: match w.id {
                Value::String(id) => id,
                other => other.to_string(),
            },
            title: w.title.unwrap_or_default(),
            app: w.app.unwrap_or_default(),
            bounds: Bounds::new(
                w.x as i32,
                w.y as i32,
                clamp_size(w.width),
                clamp_size(w.height),
            ),
        })
        .collect())
}

/// Parses `wlr-randr` output blocks
///
/// A block starts at a non-indented line naming the output. The mode line marked
/// `current` gives the size; a `Position:` line (or `at x,y` on the mode line)
/// gives the origin. Outputs without a current mode are disabled and skipped.
/// The first enumerated output is primary.
pub(crate) fn parse_wlr_randr(text: &str) -> Vec<DisplayInfo> {
    struct Block {
        name: String,
        size: Option<(u32, u32)>,
        origin: Option<(i32, i32)>,
    }

    let mut blocks: Vec<Block> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with(char::is_whitespace) {
            if let Some(name) = line.split_whitespace().next() {
                blocks.push(Block {
                    name: name.to_string(),
                    size: None,
                    origin: None,
                });
            }
            continue;
        }

        let Some(block) = blocks.last_mut() else {
            continue;
        };
        if let Some(mode) = WLR_MODE.captures(line) {
            block.size = Some((parse_size(&mode[1]), parse_size(&mode[2])));
        }
        if let Some(position) = WLR_POSITION.captures(line) {
            block.origin = Some((parse_coord(&position[1]), parse_coord(&position[2])));
        }
    }

    blocks
        .into_iter()
        .filter_map(|block| {
            let (width, height) = block.size?;
            let (x, y) = block.origin.unwrap_or((0, 0));
            Some((block.name, Bounds::new(x, y, width, height)))
        })
        .enumerate()
        .map(|(index, (name, bounds))| DisplayInfo {
            id: index as u32 + 1,
            name,
            // wlr-randr has no primary flag; the output listed first (id 1) wins
            primary: index == 0,
            bounds,
        })
        .collect()
}

/// Lists windows through GNOME Shell; empty (with a warning) anywhere else
pub(crate) async fn list_windows(
    runner: &dyn CommandRunner,
    probe: &dyn CapabilityProbe,
) -> Vec<WindowInfo> {
    let chain = FallbackChain::new("Wayland window listing").then("gnome-shell", &["gdbus"], ());

    let result = run_chain(&chain, probe, |_| async move {
        let argv = args([
            "call",
            "--session",
            "--dest",
            "org.gnome.Shell",
            "--object-path",
            "/org/gnome/Shell",
            "--method",
            "org.gnome.Shell.Eval",
            GNOME_SHELL_WINDOWS_JS,
        ]);
        let reply = runner.run("gdbus", &argv).await?;
        parse_shell_eval(&reply.stdout)
    })
    .await;

    result.unwrap_or_else(|e| {
        warn!(
            "Window listing on Wayland is limited to GNOME Shell with Eval enabled: {}",
            e
        );
        Vec::new()
    })
}

/// Lists outputs via wlr-randr
///
/// # Errors
/// `ToolUnavailable` without wlr-randr, `ExternalToolFailure` when it fails or
/// reports no enabled output
pub(crate) async fn list_displays(
    runner: &dyn CommandRunner,
    probe: &dyn CapabilityProbe,
) -> Result<Vec<DisplayInfo>, PlatformError> {
    let chain = FallbackChain::new("Wayland display listing").then("wlr-randr", &["wlr-randr"], ());

    run_chain(&chain, probe, |_| async move {
        let output = runner.run("wlr-randr", &[]).await?;
        let displays = parse_wlr_randr(&output.stdout);
        if displays.is_empty() {
            return Err(PlatformError::ExternalToolFailure(
                "wlr-randr reported no enabled outputs".to_string(),
            ));
        }
        Ok(displays)
    })
    .await
}
