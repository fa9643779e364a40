//! Temporary capture files
//!
//! Native capture tools write to a file; the adapter reads it back and removes it
//! whether or not the capture succeeded.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use glance_core::ports::platform::PlatformError;
use tracing::{debug, warn};

/// A `screenshot-<unix-millis>.png` path in the temp directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFile {
    path: PathBuf,
}

impl CaptureFile {
    pub fn new(temp_dir: &Path) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self {
            path: temp_dir.join(format!("screenshot-{}.png", millis)),
        }
    }

    /// A sibling file with an extra extension, for intermediate formats
    pub fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path as a command-line argument
    pub fn arg(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    async fn read(&self) -> Result<Vec<u8>, PlatformError> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            PlatformError::ExternalToolFailure(format!(
                "capture file {} was not written: {}",
                self.path.display(),
                e
            ))
        })?;
        if data.is_empty() {
            return Err(PlatformError::ExternalToolFailure(format!(
                "capture file {} is empty",
                self.path.display()
            )));
        }
        Ok(data)
    }
}

/// Removes a file if it exists, logging anything other than "not found"
pub async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed temporary file {:?}", path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove temporary file {:?}: {}", path, e),
    }
}

/// Runs `capture` against a fresh temp file, then reads and removes the file
///
/// The file is removed even when the capture or the read fails.
pub async fn capture_to_temp<F, Fut>(temp_dir: &Path, capture: F) -> Result<Vec<u8>, PlatformError>
where
    F: FnOnce(CaptureFile) -> Fut,
    Fut: Future<Output = Result<(), PlatformError>>,
{
    let file = CaptureFile::new(temp_dir);
    let path = file.path().to_path_buf();

    let result = match capture(file.clone()).await {
        Ok(()) => file.read().await,
        Err(e) => Err(e),
    };

    remove_quietly(&path).await;
    result
}
