//! Domain error types
//!
//! This module defines the error hierarchy for Veil.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Veil error type
///
/// This is the primary error type used throughout the library.
/// Detection failures carry the index of the slice that failed so callers
/// can report where a long document broke down.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The detection capability has not been initialized yet
    #[error("Detector not ready: call initialize() before detecting entities")]
    NotReady,

    /// Detector initialization failed
    #[error("Detector initialization failed: {0}")]
    Initialization(String),

    /// A per-slice detection call failed; the whole document is aborted
    #[error("Detection failed on slice {slice}: {source}")]
    Detection {
        /// Zero-based index of the failing slice
        slice: usize,
        /// Underlying detector failure
        #[source]
        source: DetectorError,
    },

    /// A substitution pattern could not be built or evaluated
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Audit log errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Detector-specific errors
///
/// Errors raised by a span-detection backend. These errors don't expose
/// third-party HTTP client or regex types.
#[derive(Debug, Clone, Error)]
pub enum DetectorError {
    /// Failed to reach the detection service
    #[error("Failed to connect to detection service: {0}")]
    ConnectionFailed(String),

    /// Invalid response from the detection service
    #[error("Invalid response from detection service: {0}")]
    InvalidResponse(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Invalid detection pattern in a pattern library
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Any other backend failure
    #[error("{0}")]
    Other(String),
}

impl DetectorError {
    /// Check if this error is likely transient (useful for callers that retry)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::ServerError { .. }
        )
    }
}

impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("Failed to parse TOML: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_is_distinct() {
        let err = VeilError::NotReady;
        assert!(matches!(err, VeilError::NotReady));
        assert!(err.to_string().contains("initialize"));
    }

    #[test]
    fn test_detection_error_display() {
        let err = VeilError::Detection {
            slice: 3,
            source: DetectorError::ServerError {
                status: 503,
                message: "overloaded".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("slice 3"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_detection_error_source() {
        use std::error::Error as _;

        let err = VeilError::Detection {
            slice: 0,
            source: DetectorError::Timeout("30s".to_string()),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_transient_classification() {
        assert!(DetectorError::Timeout("t".to_string()).is_transient());
        assert!(DetectorError::ConnectionFailed("c".to_string()).is_transient());
        assert!(!DetectorError::InvalidResponse("r".to_string()).is_transient());
        assert!(!DetectorError::ClientError {
            status: 400,
            message: "bad".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: VeilError = io_err.into();
        assert!(matches!(err, VeilError::Io(_)));
    }
}
