//! OS platform adapters
//!
//! Every adapter drives native tools through the `CommandRunner` port, so all three
//! compile (and are tested) on every host.

pub mod linux;
pub mod macos;
pub mod windows;

pub use linux::LinuxPlatform;
pub use macos::MacOsPlatform;
pub use windows::WindowsPlatform;

use std::future::Future;

use glance_core::fallback::{FallbackChain, ToolStep};
use glance_core::ports::platform::PlatformError;
use glance_core::ports::probe::CapabilityProbe;
use tracing::{debug, warn};

/// Walks a fallback chain until one step succeeds
///
/// A step failing with a tool or IO error hands over to the next available step.
/// Target errors end the walk immediately since another tool cannot fix them.
/// When no step is available the chain's `ToolUnavailable` error is returned;
/// when steps ran and all failed, the last failure is.
pub(crate) async fn run_chain<A, T, F, Fut>(
    chain: &FallbackChain<A>,
    probe: &dyn CapabilityProbe,
    mut attempt: F,
) -> Result<T, PlatformError>
where
    A: Clone,
    F: FnMut(ToolStep<A>) -> Fut,
    Fut: Future<Output = Result<T, PlatformError>>,
{
    let mut last_error = None;

    for step in chain.available(probe).await {
        debug!("{}: trying {}", chain.family(), step.name);
        match attempt(step.clone()).await {
            Ok(value) => {
                debug!("{}: {} succeeded", chain.family(), step.name);
                return Ok(value);
            }
            Err(e @ (PlatformError::ExternalToolFailure(_) | PlatformError::Io(_))) => {
                warn!("{}: {} failed: {}", chain.family(), step.name, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| chain.unavailable_error()))
}

/// Strings the native tools receive as argv
pub(crate) fn args<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
