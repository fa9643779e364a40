//! Linux capture tool chains
//!
//! Each capture kind has its own ordered chain of tools, which also depends on the
//! display server. Steps that cannot isolate the target capture the whole screen.

use std::path::{Path, PathBuf};

use glance_core::fallback::FallbackChain;
use glance_core::ports::platform::{Bounds, PlatformError};
use glance_core::ports::process::CommandRunner;

use super::display_server::DisplayServer;
use crate::capture_file::{remove_quietly, CaptureFile};
use crate::platform::args;

/// One native capture command, fully specified except for the output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CaptureCommand {
    /// `import -window <id>`
    ImportWindow(String),
    /// `xwd -id <id>` piped through `convert`
    XwdConvert(String),
    /// `import -window root -crop WxH+X+Y`
    ImportCrop(Bounds),
    /// `scrot -a x,y,w,h`
    ScrotArea(Bounds),
    /// `grim -g "x,y wxh"`
    GrimRegion(Bounds),
    /// `gnome-screenshot -f`
    GnomeScreenshot,
    /// `scrot`
    Scrot,
    /// `import -window root`
    ImportRoot,
    /// `grim`
    Grim,
}

/// A program and its arguments
pub(crate) type Invocation = (&'static str, Vec<String>);

impl CaptureCommand {
    /// Intermediate file the command needs besides the PNG output
    pub fn scratch_file(&self, file: &CaptureFile) -> Option<PathBuf> {
        match self {
            CaptureCommand::XwdConvert(_) => Some(file.sibling("xwd")),
            _ => None,
        }
    }

    /// The processes to run, in order, to produce `output`
    pub fn invocations(&self, output: &Path, scratch: Option<&Path>) -> Vec<Invocation> {
        let out = output.to_string_lossy().into_owned();
        match self {
            CaptureCommand::ImportWindow(id) => {
                vec![("import", args(["-window", id.as_str(), out.as_str()]))]
            }
            CaptureCommand::XwdConvert(id) => {
                let dump = scratch
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|| format!("{}.xwd", out));
                vec![
                    ("xwd", args(["-id", id.as_str(), "-out", dump.as_str()])),
                    ("convert", args([dump.as_str(), out.as_str()])),
                ]
            }
            CaptureCommand::ImportCrop(r) => {
                let geometry = format!("{}x{}{:+}{:+}", r.width, r.height, r.x, r.y);
                vec![(
                    "import",
                    args(["-window", "root", "-crop", geometry.as_str(), out.as_str()]),
                )]
            }
            CaptureCommand::ScrotArea(r) => {
                let area = format!("{},{},{},{}", r.x, r.y, r.width, r.height);
                vec![("scrot", args(["-a", area.as_str(), out.as_str()]))]
            }
            CaptureCommand::GrimRegion(r) => {
                let geometry = format!("{},{} {}x{}", r.x, r.y, r.width, r.height);
                vec![("grim", args(["-g", geometry.as_str(), out.as_str()]))]
            }
            CaptureCommand::GnomeScreenshot => {
                vec![("gnome-screenshot", args(["-f", out.as_str()]))]
            }
            CaptureCommand::Scrot => vec![("scrot", args([out]))],
            CaptureCommand::ImportRoot => {
                vec![("import", args(["-window", "root", out.as_str()]))]
            }
            CaptureCommand::Grim => vec![("grim", args([out]))],
        }
    }
}

/// Window capture: by X window id where possible, else the whole screen
pub(crate) fn window_chain(server: DisplayServer, window_id: &str) -> FallbackChain<CaptureCommand> {
    let chain = FallbackChain::new("window screenshot");
    let chain = if server == DisplayServer::X11 {
        chain
            .then("import", &["import"], CaptureCommand::ImportWindow(window_id.to_string()))
            .then(
                "xwd",
                &["xwd", "convert"],
                CaptureCommand::XwdConvert(window_id.to_string()),
            )
    } else {
        chain
    };
    chain.then_whole_screen(
        "gnome-screenshot",
        &["gnome-screenshot"],
        CaptureCommand::GnomeScreenshot,
    )
}

/// Region capture: cropping tools first, whole screen last
pub(crate) fn region_chain(server: DisplayServer, region: Bounds) -> FallbackChain<CaptureCommand> {
    let chain = FallbackChain::new("region screenshot");
    let chain = if server == DisplayServer::Wayland {
        chain.then("grim", &["grim"], CaptureCommand::GrimRegion(region))
    } else {
        chain
    };
    chain
        .then("import", &["import"], CaptureCommand::ImportCrop(region))
        .then("scrot", &["scrot"], CaptureCommand::ScrotArea(region))
        .then_whole_screen(
            "gnome-screenshot",
            &["gnome-screenshot"],
            CaptureCommand::GnomeScreenshot,
        )
}

/// Full-screen capture
pub(crate) fn screen_chain(server: DisplayServer) -> FallbackChain<CaptureCommand> {
    let chain = FallbackChain::new("screen screenshot")
        .then(
            "gnome-screenshot",
            &["gnome-screenshot"],
            CaptureCommand::GnomeScreenshot,
        )
        .then("scrot", &["scrot"], CaptureCommand::Scrot)
        .then("import", &["import"], CaptureCommand::ImportRoot);
    if server == DisplayServer::Wayland {
        chain.then("grim", &["grim"], CaptureCommand::Grim)
    } else {
        chain
    }
}

/// Runs every process of `command` to fill `file`
///
/// Intermediate files are removed whatever the outcome.
pub(crate) async fn execute(
    runner: &dyn CommandRunner,
    command: &CaptureCommand,
    file: &CaptureFile,
) -> Result<(), PlatformError> {
    let scratch = command.scratch_file(file);

    let mut result = Ok(());
    for (program, argv) in command.invocations(file.path(), scratch.as_deref()) {
        if let Err(e) = runner.run(program, &argv).await {
            result = Err(e.into());
            break;
        }
    }

    if let Some(scratch) = scratch {
        remove_quietly(&scratch).await;
    }
    result
}
