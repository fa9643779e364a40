//! PATH lookup capability probe

use async_trait::async_trait;
use glance_core::ports::probe::CapabilityProbe;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Reports a tool as available when an executable of that name is on PATH
#[derive(Debug, Clone, Default)]
pub struct PathProbe {
    search_path: Option<OsString>,
}

impl PathProbe {
    /// Probe using the `PATH` of the current process
    pub fn new() -> Self {
        Self { search_path: None }
    }

    /// Probe using an explicit search path
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn find(&self, command: &str) -> Option<PathBuf> {
        if command.is_empty() || command.contains(['/', '\\']) {
            return None;
        }

        let search_path = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))?;

        std::env::split_paths(&search_path)
            .flat_map(|dir| candidates(&dir, command))
            .find(|candidate| is_executable(candidate))
    }
}

#[async_trait]
impl CapabilityProbe for PathProbe {
    async fn exists(&self, command: &str) -> bool {
        let found = self.find(command);
        tracing::trace!("Probe {}: {:?}", command, found);
        found.is_some()
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, command: &str) -> Vec<PathBuf> {
    let extensions = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    let mut paths = vec![dir.join(command)];
    paths.extend(
        extensions
            .split(';')
            .filter(|ext| !ext.is_empty())
            .map(|ext| dir.join(format!("{}{}", command, ext))),
    );
    paths
}

#[cfg(not(windows))]
fn candidates(dir: &Path, command: &str) -> Vec<PathBuf> {
    vec![dir.join(command)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn install(dir: &Path, name: &str, mode: u32) {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    #[tokio::test]
    async fn test_finds_executable_on_search_path() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        install(second.path(), "scrot", 0o755);

        let search_path = std::env::join_paths([first.path(), second.path()]).unwrap();
        let probe = PathProbe::with_search_path(search_path);

        assert!(probe.exists("scrot").await);
        assert!(!probe.exists("grim").await);
    }

    #[tokio::test]
    async fn test_ignores_non_executable_files() {
        let dir = TempDir::new().unwrap();
        install(dir.path(), "xdotool", 0o644);

        let probe = PathProbe::with_search_path(dir.path().as_os_str());
        assert!(!probe.exists("xdotool").await);
    }

    #[tokio::test]
    async fn test_rejects_paths_and_empty_names() {
        let dir = TempDir::new().unwrap();
        install(dir.path(), "import", 0o755);

        let probe = PathProbe::with_search_path(dir.path().as_os_str());
        assert!(!probe.exists("").await);
        assert!(!probe.exists("../import").await);
    }
}
