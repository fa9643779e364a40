//! Process execution port
//!
//! Every adapter reaches the OS through this one narrow capability, so adapter
//! logic can be exercised with canned process output.

use async_trait::async_trait;
use thiserror::Error;

/// Captured output of a successful external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }
}

/// Errors that can occur while running an external command
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("'{program}' exited with {}: {stderr}", describe_code(.code))]
    Exit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Port for running external programs
///
/// No timeout is imposed: a hung tool blocks the calling operation until it exits.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`, returning its output or failing on non-zero exit
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ProcessError>;
}
