//! Configuration types for the recorder.

/// Configuration for a [`RecorderLayer`](crate::RecorderLayer).
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Maximum number of events retained per target.
    pub max_events: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self { max_events: 1000 }
    }
}

impl RecorderConfig {
    /// Set the maximum number of events to retain per target.
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = RecorderConfig::default();
        assert_eq!(config.max_events, 1000);
    }

    #[test]
    fn test_config_builder() {
        let config = RecorderConfig::default().with_max_events(500);
        assert_eq!(config.max_events, 500);
    }
}
