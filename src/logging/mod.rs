//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Human-readable console output on stderr
//! - JSON-formatted local file logs with rotation
//!
//! Log records never carry entity text; use ids, types, counts and lengths.
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a detection pass
///
/// # Example
///
/// ```no_run
/// use veil::log_detection_start;
///
/// log_detection_start!("patterns", 24_000, 8, 1);
/// ```
#[macro_export]
macro_rules! log_detection_start {
    ($detector:expr, $chars:expr, $labels:expr, $concurrency:expr) => {
        tracing::info!(
            detector = $detector,
            input_chars = $chars,
            labels = $labels,
            concurrency = $concurrency,
            "Starting detection"
        );
    };
}

/// Log the completion of a document redaction
///
/// # Example
///
/// ```no_run
/// use veil::log_redaction_complete;
/// use std::time::Duration;
///
/// log_redaction_complete!("memo.txt", 4, 7, Duration::from_millis(120));
/// ```
#[macro_export]
macro_rules! log_redaction_complete {
    ($document_id:expr, $entities:expr, $placeholders:expr, $duration:expr) => {
        tracing::info!(
            document_id = %$document_id,
            entities = $entities,
            placeholders = $placeholders,
            duration_ms = $duration.as_millis() as u64,
            "Redaction completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use veil::log_error_with_context;
/// use veil::domain::VeilError;
///
/// let error = VeilError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::VeilError;
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        log_detection_start!("patterns", 10usize, 2usize, 1usize);
        log_redaction_complete!("doc", 1usize, 2usize, Duration::from_millis(5));
        log_error_with_context!(&VeilError::NotReady, "detect");
    }
}
