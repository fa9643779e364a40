//! Ordered native-tool fallback chains
//!
//! A chain is plain data: an ordered list of steps, each naming the tools it needs
//! and the action to perform when they are present. Adapters ask the chain which
//! steps are usable on this machine and try them in order, so the selection logic
//! can be checked against a fake probe without any tool installed.

use crate::ports::platform::PlatformError;
use crate::ports::probe::CapabilityProbe;

/// One alternative in a fallback chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStep<A> {
    /// Display name of the step
    pub name: &'static str,
    /// Every tool that must be on PATH for this step
    pub requires: &'static [&'static str],
    /// What the adapter does for this step
    pub action: A,
    /// False when the step captures the whole screen instead of the requested target
    pub exact: bool,
}

/// An ordered list of alternative tools for one capability
#[derive(Debug, Clone)]
pub struct FallbackChain<A> {
    family: &'static str,
    steps: Vec<ToolStep<A>>,
}

impl<A> FallbackChain<A> {
    /// Creates an empty chain for a tool family (used in error messages)
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            steps: Vec::new(),
        }
    }

    /// Appends a step that produces exactly the requested target
    pub fn then(mut self, name: &'static str, requires: &'static [&'static str], action: A) -> Self {
        self.steps.push(ToolStep {
            name,
            requires,
            action,
            exact: true,
        });
        self
    }

    /// Appends a step that can only capture the whole screen
    pub fn then_whole_screen(
        mut self,
        name: &'static str,
        requires: &'static [&'static str],
        action: A,
    ) -> Self {
        self.steps.push(ToolStep {
            name,
            requires,
            action,
            exact: false,
        });
        self
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn steps(&self) -> &[ToolStep<A>] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps whose required tools all exist, in preference order
    pub async fn available(&self, probe: &dyn CapabilityProbe) -> Vec<&ToolStep<A>> {
        let mut usable = Vec::new();
        for step in &self.steps {
            if is_installed(step, probe).await {
                usable.push(step);
            }
        }
        usable
    }

    /// The first usable step, if any
    pub async fn select(&self, probe: &dyn CapabilityProbe) -> Option<&ToolStep<A>> {
        for step in &self.steps {
            if is_installed(step, probe).await {
                return Some(step);
            }
        }
        None
    }

    /// Every distinct tool named anywhere in the chain, in order
    pub fn tool_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for step in &self.steps {
            for tool in step.requires {
                if !names.contains(tool) {
                    names.push(*tool);
                }
            }
        }
        names
    }

    /// The error reported once the whole chain is exhausted without a usable tool
    pub fn unavailable_error(&self) -> PlatformError {
        PlatformError::ToolUnavailable {
            family: self.family.to_string(),
            tools: self.tool_names().join(", "),
        }
    }
}

async fn is_installed<A>(step: &ToolStep<A>, probe: &dyn CapabilityProbe) -> bool {
    for tool in step.requires {
        if !probe.exists(tool).await {
            return false;
        }
    }
    true
}
