//! Error types for recorder operations.

use thiserror::Error;

/// Errors that can occur while reading events back out of the recorder.
/// These are errors in the recording infrastructure itself, NOT application
/// errors being logged.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// Serialization error while exporting events
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No events have been recorded for the requested target
    #[error("No events recorded for target: {0}")]
    UnknownTarget(String),
}

/// Result type for recorder operations.
pub type Result<T> = std::result::Result<T, RecorderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_target_display() {
        let err = RecorderError::UnknownTarget("my_crate::module".to_string());
        assert!(err.to_string().contains("my_crate::module"));
    }
}
