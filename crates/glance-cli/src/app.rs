//! Application initialization
//!
//! Loads configuration, starts logging, installs the panic hook and prepares the
//! lazily-resolved platform adapter shared by every command.

use std::panic;
use std::path::PathBuf;

use glance_adapters::{system_factory, AdapterOptions};
use glance_core::config::expand_tilde;
use glance_core::error::{ConfigError, GlanceError};
use glance_core::{
    init_logger, load_config, load_config_from_path, Config, LogLevel, LoggerConfig,
    LoggerGuard, PlatformFactory, PlatformSelector, ScreenshotService,
};
use tracing::{debug, error};

/// Application context holding initialized components
pub struct AppContext {
    config: Config,
    selector: PlatformSelector,
    #[allow(dead_code)]
    logger_guard: Option<LoggerGuard>,
}

impl AppContext {
    /// Builds a context around an already loaded configuration
    pub fn new(config: Config, factory: impl PlatformFactory + 'static) -> Self {
        Self {
            config,
            selector: PlatformSelector::for_current_os(factory),
            logger_guard: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The screenshot service over this OS's adapter
    ///
    /// # Errors
    /// `UnsupportedPlatform` when no adapter exists for the running OS
    pub fn service(&self) -> Result<ScreenshotService, GlanceError> {
        Ok(ScreenshotService::new(self.selector.resolve()?))
    }

    /// A `--save-dir` flag wins over `capture.save_dir` from the config file
    pub fn save_dir(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.map(|dir| expand_tilde(&dir))
            .or_else(|| self.config.capture.save_dir.clone())
    }
}

/// Application initialization options
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Configuration file; `~/.glance/config.toml` when unset
    pub config_path: Option<PathBuf>,
    /// Log level override (takes precedence over the config file)
    pub log_level: Option<String>,
    /// Mirror logs to stderr
    pub verbose: bool,
    /// Whether to initialize the logger
    pub init_logger: bool,
}

/// Initializes the glance application
///
/// 1. Load configuration
/// 2. Initialize logging (if requested)
/// 3. Set up the panic hook
/// 4. Prepare the platform selector
///
/// # Errors
/// Setup failures come back as `GlanceError` so they are reported like any
/// other command failure.
pub fn initialize(options: InitOptions) -> Result<AppContext, GlanceError> {
    let config = match &options.config_path {
        Some(path) => load_config_from_path(&expand_tilde(path)),
        None => load_config(),
    }?;

    let log_level = match &options.log_level {
        Some(level) => level
            .parse::<LogLevel>()
            .map_err(|e| ConfigError::InvalidValue(format!("--log-level: {}", e)))?,
        None => config.log_level()?,
    };

    let logger_config = LoggerConfig::with_default_dir()
        .with_level(log_level)
        .with_stderr(options.verbose || config.logging.stderr);
    let log_file = logger_config.log_file_path();

    let logger_guard = if options.init_logger {
        Some(init_logger(logger_config)?)
    } else {
        None
    };

    setup_panic_hook(log_file);

    let adapter_options = AdapterOptions::from_config(&config)?;
    debug!("Adapter options: {:?}", adapter_options);

    let mut ctx = AppContext::new(config, system_factory(adapter_options));
    ctx.logger_guard = logger_guard;
    Ok(ctx)
}

/// Logs panics before handing over to the default hook
fn setup_panic_hook(log_file: PathBuf) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        error!("FATAL ERROR at {}: {}", location, message);

        eprintln!("glance encountered a fatal error at {}: {}", location, message);
        eprintln!("See the log file at: {}", log_file.display());

        default_hook(panic_info);
    }));
}
