//! glance CLI - window listing and screenshots from the command line
//!
//! Every command prints one JSON document on stdout. Failures print
//! `{"ok": false, "error": {...}}` and exit with status 1.

mod app;
mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use app::InitOptions;
use commands::{region::RegionArgs, screen::ScreenArgs, window::WindowArgs};

#[derive(Parser, Debug)]
#[command(
    name = "glance",
    version,
    about = "List windows and displays and take screenshots on macOS, Windows and Linux"
)]
struct Cli {
    /// Configuration file (default: ~/.glance/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level override: error, warn, info, debug or trace
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List visible windows
    Windows,
    /// List attached displays
    Displays,
    /// Capture a window by id or title
    Window(WindowArgs),
    /// Capture a display (the primary one by default)
    Screen(ScreenArgs),
    /// Capture a rectangle of the screen
    #[command(allow_negative_numbers = true)]
    Region(RegionArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let ctx = match app::initialize(InitOptions {
        config_path: cli.config,
        log_level: cli.log_level,
        verbose: cli.verbose,
        init_logger: true,
    }) {
        Ok(ctx) => ctx,
        Err(err) => return output::render::<()>(Err(err)),
    };

    match cli.command {
        Commands::Windows => output::render(commands::windows::run(&ctx).await),
        Commands::Displays => output::render(commands::displays::run(&ctx).await),
        Commands::Window(args) => output::render(commands::window::run(&ctx, args).await),
        Commands::Screen(args) => output::render(commands::screen::run(&ctx, args).await),
        Commands::Region(args) => output::render(commands::region::run(&ctx, args).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_region_with_negative_origin() {
        let cli = Cli::try_parse_from(["glance", "region", "-1920", "-10", "800", "600"]).unwrap();
        match cli.command {
            Commands::Region(args) => {
                assert_eq!((args.x, args.y, args.width, args.height), (-1920, -10, 800, 600));
                assert!(args.output.save_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_window_by_title_with_global_flags() {
        let cli = Cli::try_parse_from([
            "glance",
            "window",
            "--title",
            "firefox",
            "--no-image",
            "--save-dir",
            "/tmp/shots",
            "--log-level",
            "debug",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Window(args) => {
                assert_eq!(args.title.as_deref(), Some("firefox"));
                assert!(args.id.is_none());
                assert!(args.output.no_image);
                assert_eq!(args.output.save_dir, Some(PathBuf::from("/tmp/shots")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_screen_display() {
        let cli = Cli::try_parse_from(["glance", "screen", "--display", "2"]).unwrap();
        match cli.command {
            Commands::Screen(args) => assert_eq!(args.display, Some(2)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_region_requires_all_coordinates() {
        assert!(Cli::try_parse_from(["glance", "region", "0", "0", "100"]).is_err());
    }
}
