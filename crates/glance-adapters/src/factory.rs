//! Adapter construction for the platform selector

use std::path::PathBuf;
use std::sync::Arc;

use glance_core::config::{Config, DisplayServerPreference};
use glance_core::error::ConfigError;
use glance_core::ports::environment::Environment;
use glance_core::ports::platform::PlatformPort;
use glance_core::ports::probe::CapabilityProbe;
use glance_core::ports::process::CommandRunner;
use glance_core::selector::{OsKind, PlatformFactory};

use crate::environment::SystemEnvironment;
use crate::platform::{LinuxPlatform, MacOsPlatform, WindowsPlatform};
use crate::probe::PathProbe;
use crate::runner::TokioCommandRunner;

/// Settings shared by every adapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Where capture files are written; the system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    /// Linux display-server override
    pub display_server: DisplayServerPreference,
}

impl AdapterOptions {
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for an unknown display-server name
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            temp_dir: config.capture.temp_dir.clone(),
            display_server: config.display_server()?,
        })
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Factory wiring the given collaborators into the adapter for each OS
pub fn native_factory(
    options: AdapterOptions,
    runner: Arc<dyn CommandRunner>,
    probe: Arc<dyn CapabilityProbe>,
    env: Arc<dyn Environment>,
) -> impl PlatformFactory {
    move |os: OsKind| -> Arc<dyn PlatformPort> {
        let temp_dir = options.temp_dir();
        match os {
            OsKind::MacOs => Arc::new(MacOsPlatform::new(runner.clone(), probe.clone(), temp_dir)),
            OsKind::Windows => {
                Arc::new(WindowsPlatform::new(runner.clone(), probe.clone(), temp_dir))
            }
            OsKind::Linux => Arc::new(LinuxPlatform::new(
                runner.clone(),
                probe.clone(),
                env.clone(),
                options.display_server,
                temp_dir,
            )),
        }
    }
}

/// Factory backed by real processes, `PATH` lookups and the process environment
pub fn system_factory(options: AdapterOptions) -> impl PlatformFactory {
    native_factory(
        options,
        Arc::new(TokioCommandRunner::new()),
        Arc::new(PathProbe::new()),
        Arc::new(SystemEnvironment),
    )
}
