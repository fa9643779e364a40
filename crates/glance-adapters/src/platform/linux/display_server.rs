//! Display-server detection

use std::fmt;

use glance_core::config::DisplayServerPreference;
use glance_core::ports::environment::Environment;

/// The windowing protocol of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    X11,
    Wayland,
    Unknown,
}

impl fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayServer::X11 => write!(f, "x11"),
            DisplayServer::Wayland => write!(f, "wayland"),
            DisplayServer::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classifies the session from its environment
///
/// `XDG_SESSION_TYPE` wins when it names x11 or wayland; otherwise a
/// `WAYLAND_DISPLAY` socket means Wayland and a `DISPLAY` means X11.
pub fn detect(env: &dyn Environment) -> DisplayServer {
    match env.var("XDG_SESSION_TYPE").as_deref() {
        Some("wayland") => return DisplayServer::Wayland,
        Some("x11") => return DisplayServer::X11,
        _ => {}
    }

    if env.var("WAYLAND_DISPLAY").is_some() {
        DisplayServer::Wayland
    } else if env.var("DISPLAY").is_some() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

/// Applies a configured override before falling back to detection
pub fn resolve(preference: DisplayServerPreference, env: &dyn Environment) -> DisplayServer {
    match preference {
        DisplayServerPreference::X11 => DisplayServer::X11,
        DisplayServerPreference::Wayland => DisplayServer::Wayland,
        DisplayServerPreference::Auto => detect(env),
    }
}
