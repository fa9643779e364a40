//! Environment variable port

/// Read-only view of the process environment
pub trait Environment: Send + Sync {
    /// Returns the variable's value; unset and empty are both `None`
    fn var(&self, key: &str) -> Option<String>;
}

impl Environment for std::collections::HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.is_empty()).cloned()
    }
}
