//! Capability probe port

use async_trait::async_trait;

/// Port answering "is this external tool installed here?"
///
/// Implementations never fail: a missing tool and a failed check both report `false`.
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    async fn exists(&self, command: &str) -> bool;
}
