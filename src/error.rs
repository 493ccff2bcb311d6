//! Error types for the synchronization core

use std::fmt;

/// Errors that can occur while setting up the synchronization core
///
/// The step cycle itself never fails: numeric degeneracy is absorbed where it
/// is detected. Everything here is surfaced at construction time.
#[derive(Debug, Clone)]
pub enum SyncError {
    /// The audio stream cannot satisfy the fixed buffer contract
    /// (wrong sample rate, chunks too small)
    ConfigurationMismatch(String),

    /// Invalid constructor arguments
    InvalidInput(String),

    /// Audio decoding error while reading a file source
    DecodingError(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::ConfigurationMismatch(msg) => write!(f, "Configuration mismatch: {}", msg),
            SyncError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            SyncError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<hound::Error> for SyncError {
    fn from(err: hound::Error) -> Self {
        SyncError::DecodingError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = SyncError::ConfigurationMismatch("44100 Hz stream".to_string());
        assert_eq!(err.to_string(), "Configuration mismatch: 44100 Hz stream");

        let err = SyncError::DecodingError("truncated header".to_string());
        assert!(err.to_string().starts_with("Decoding error"));
    }
}
