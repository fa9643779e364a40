//! Process environment reader

use glance_core::ports::environment::Environment;

/// Reads variables from the environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_path() {
        assert!(SystemEnvironment.var("PATH").is_some());
        assert!(SystemEnvironment
            .var("GLANCE_TEST_SURELY_UNSET_VARIABLE")
            .is_none());
    }
}
