//! Platform selection
//!
//! Resolves the single adapter for the running operating system. The adapter is
//! built lazily on first use and shared for the rest of the process; tests pass
//! their own factory to substitute a fake platform.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::ports::platform::{PlatformError, PlatformPort};

/// Operating systems with an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsKind {
    MacOs,
    Windows,
    Linux,
}

impl OsKind {
    /// Maps an OS identifier (as reported by `std::env::consts::OS`) to a variant
    ///
    /// # Errors
    /// Returns `PlatformError::UnsupportedPlatform` carrying the identifier
    pub fn from_identifier(identifier: &str) -> Result<Self, PlatformError> {
        match identifier {
            "macos" | "darwin" => Ok(OsKind::MacOs),
            "windows" | "win32" => Ok(OsKind::Windows),
            "linux" => Ok(OsKind::Linux),
            other => Err(PlatformError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// The OS this binary was compiled for
    pub fn current() -> Result<Self, PlatformError> {
        Self::from_identifier(std::env::consts::OS)
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsKind::MacOs => write!(f, "macos"),
            OsKind::Windows => write!(f, "windows"),
            OsKind::Linux => write!(f, "linux"),
        }
    }
}

/// Builds the adapter for a supported OS
pub trait PlatformFactory: Send + Sync {
    fn create(&self, os: OsKind) -> Arc<dyn PlatformPort>;
}

impl<F> PlatformFactory for F
where
    F: Fn(OsKind) -> Arc<dyn PlatformPort> + Send + Sync,
{
    fn create(&self, os: OsKind) -> Arc<dyn PlatformPort> {
        self(os)
    }
}

/// Lazily resolves and memoizes the platform adapter
pub struct PlatformSelector {
    os_identifier: String,
    factory: Box<dyn PlatformFactory>,
    resolved: OnceLock<Arc<dyn PlatformPort>>,
}

impl PlatformSelector {
    /// Creates a selector for an explicit OS identifier
    pub fn new(os_identifier: impl Into<String>, factory: impl PlatformFactory + 'static) -> Self {
        Self {
            os_identifier: os_identifier.into(),
            factory: Box::new(factory),
            resolved: OnceLock::new(),
        }
    }

    /// Creates a selector for the OS this binary runs on
    pub fn for_current_os(factory: impl PlatformFactory + 'static) -> Self {
        Self::new(std::env::consts::OS, factory)
    }

    pub fn os_identifier(&self) -> &str {
        &self.os_identifier
    }

    /// Returns the adapter for this OS, constructing it on the first call
    ///
    /// # Errors
    /// Returns `PlatformError::UnsupportedPlatform` for an unrecognized OS. The
    /// factory is never invoked in that case.
    pub fn resolve(&self) -> Result<Arc<dyn PlatformPort>, PlatformError> {
        if let Some(platform) = self.resolved.get() {
            return Ok(Arc::clone(platform));
        }

        let os = OsKind::from_identifier(&self.os_identifier)?;
        let platform = self.resolved.get_or_init(|| {
            debug!("Constructing platform adapter for {}", os);
            let platform = self.factory.create(os);
            info!(os = %os, adapter = platform.name(), "Platform adapter selected");
            platform
        });
        Ok(Arc::clone(platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::platform::{Bounds, CapturedImage, DisplayInfo, WindowInfo};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullPlatform;

    #[async_trait]
    impl PlatformPort for NullPlatform {
        fn name(&self) -> &'static str {
            "null"
        }

        async fn list_windows(&self) -> Vec<WindowInfo> {
            vec![]
        }

        async fn list_displays(&self) -> Vec<DisplayInfo> {
            vec![DisplayInfo::synthetic_default()]
        }

        async fn screenshot_window(&self, _id: &str) -> Result<CapturedImage, PlatformError> {
            Err(PlatformError::ExternalToolFailure("null".to_string()))
        }

        async fn screenshot_screen(
            &self,
            _display_id: Option<u32>,
        ) -> Result<CapturedImage, PlatformError> {
            Err(PlatformError::ExternalToolFailure("null".to_string()))
        }

        async fn screenshot_region(&self, _region: Bounds) -> Result<CapturedImage, PlatformError> {
            Err(PlatformError::ExternalToolFailure("null".to_string()))
        }
    }

    fn counting_factory(counter: Arc<AtomicUsize>) -> impl PlatformFactory {
        move |_os: OsKind| -> Arc<dyn PlatformPort> {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(NullPlatform)
        }
    }

    #[test]
    fn test_os_identifiers() {
        assert_eq!(OsKind::from_identifier("macos").unwrap(), OsKind::MacOs);
        assert_eq!(OsKind::from_identifier("darwin").unwrap(), OsKind::MacOs);
        assert_eq!(OsKind::from_identifier("windows").unwrap(), OsKind::Windows);
        assert_eq!(OsKind::from_identifier("win32").unwrap(), OsKind::Windows);
        assert_eq!(OsKind::from_identifier("linux").unwrap(), OsKind::Linux);
    }

    #[test]
    fn test_unknown_identifier_is_unsupported() {
        let err = OsKind::from_identifier("freebsd").unwrap_err();
        assert!(matches!(err, PlatformError::UnsupportedPlatform(ref os) if os == "freebsd"));
    }

    #[test]
    fn test_os_kind_display() {
        assert_eq!(OsKind::MacOs.to_string(), "macos");
        assert_eq!(OsKind::Windows.to_string(), "windows");
        assert_eq!(OsKind::Linux.to_string(), "linux");
    }

    #[test]
    fn test_resolve_is_memoized() {
        let counter = Arc::new(AtomicUsize::new(0));
        let selector = PlatformSelector::new("linux", counting_factory(Arc::clone(&counter)));

        let first = selector.resolve().unwrap();
        let second = selector.resolve().unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "null");
    }

    #[test]
    fn test_unsupported_os_never_builds_adapter() {
        let counter = Arc::new(AtomicUsize::new(0));
        let selector = PlatformSelector::new("haiku", counting_factory(Arc::clone(&counter)));

        for _ in 0..2 {
            let err = selector.resolve().err().unwrap();
            assert!(matches!(err, PlatformError::UnsupportedPlatform(_)));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(selector.os_identifier(), "haiku");
    }
}
