//! Hand-written fakes for adapter tests

use async_trait::async_trait;
use glance_core::ports::probe::CapabilityProbe;
use glance_core::ports::process::{CommandOutput, CommandRunner, ProcessError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

static CAPTURE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[^\s'"]*screenshot-\d+\.png(?:\.xwd)?"#).unwrap());

pub(crate) fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&vec![0u8; (width * height * 3) as usize])
            .unwrap();
    }
    data
}

enum Reply {
    Stdout(String),
    Fail(String),
}

/// Runner returning canned replies for command lines containing a pattern
///
/// Successful invocations write a small PNG to every capture-file path found in
/// their arguments, the way a real capture tool would. Like `swift`, a run fails
/// when a `.swift` argument no longer exists once the (optional) delay is over.
pub(crate) struct FakeRunner {
    rules: Vec<(String, Reply)>,
    calls: Mutex<Vec<String>>,
    image: Vec<u8>,
    delay: Option<Duration>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
            image: encode_png(4, 3),
            delay: None,
        }
    }

    /// Replies with `stdout` to command lines containing `pattern`
    pub fn on(mut self, pattern: &str, stdout: &str) -> Self {
        self.rules
            .push((pattern.to_string(), Reply::Stdout(stdout.to_string())));
        self
    }

    /// Fails command lines containing `pattern` with a non-zero exit
    pub fn fail(mut self, pattern: &str, stderr: &str) -> Self {
        self.rules
            .push((pattern.to_string(), Reply::Fail(stderr.to_string())));
        self
    }

    /// Every invocation sleeps this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_image(mut self, width: u32, height: u32) -> Self {
        self.image = encode_png(width, height);
        self
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Every command line run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Command lines run by `program`
    pub fn calls_to(&self, program: &str) -> Vec<String> {
        let prefix = format!("{} ", program);
        self.calls()
            .into_iter()
            .filter(|c| c == program || c.starts_with(&prefix))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, ProcessError> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(missing) = args
            .iter()
            .find(|arg| arg.ends_with(".swift") && !Path::new(arg.as_str()).exists())
        {
            return Err(ProcessError::Exit {
                program: program.to_string(),
                code: Some(1),
                stderr: format!("error: no such file or directory: '{}'", missing),
            });
        }

        let reply = self
            .rules
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, reply)| reply);

        match reply {
            Some(Reply::Fail(stderr)) => Err(ProcessError::Exit {
                program: program.to_string(),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            Some(Reply::Stdout(stdout)) => {
                write_capture_files(args, &self.image);
                Ok(CommandOutput::new(stdout.clone()))
            }
            None => {
                write_capture_files(args, &self.image);
                Ok(CommandOutput::default())
            }
        }
    }
}

fn write_capture_files(args: &[String], image: &[u8]) {
    for arg in args {
        for found in CAPTURE_PATH.find_iter(arg) {
            std::fs::write(found.as_str(), image).unwrap();
        }
    }
}

/// Probe reporting a fixed set of installed tools
pub(crate) struct FakeProbe {
    installed: HashSet<String>,
}

impl FakeProbe {
    pub fn new(installed: &[&str]) -> Self {
        Self {
            installed: installed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl CapabilityProbe for FakeProbe {
    async fn exists(&self, command: &str) -> bool {
        self.installed.contains(command)
    }
}

pub(crate) fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
