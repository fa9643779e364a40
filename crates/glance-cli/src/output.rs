//! JSON rendering of command results

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use glance_core::error::GlanceError;
use serde::Serialize;
use tracing::error;

/// The JSON document printed for a failed command
pub fn failure_json(err: &GlanceError) -> serde_json::Value {
    serde_json::json!({
        "ok": false,
        "error": {
            "kind": err.kind(),
            "message": err.to_string(),
        },
    })
}

/// Prints the outcome of a command and picks the exit status
///
/// # Errors
/// Only when stdout cannot be written
pub fn render<T: Serialize>(outcome: Result<T, GlanceError>) -> Result<ExitCode> {
    let (document, status) = match outcome {
        Ok(value) => (
            serde_json::to_value(&value).context("Failed to serialize result")?,
            ExitCode::SUCCESS,
        ),
        Err(err) => {
            error!("Command failed: {}", err);
            (failure_json(&err), ExitCode::FAILURE)
        }
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &document).context("Failed to write output")?;
    writeln!(stdout).context("Failed to write output")?;
    Ok(status)
}
