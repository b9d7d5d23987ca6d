//! Configuration management for Veil.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Veil uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//!
//! println!("Detector backend: {}", config.detection.backend);
//! println!("Labels: {}", config.detection.labels.join(", "));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`DetectionConfig`] - Detector backend, slicing, threshold, labels
//! - [`AuditConfig`] - Audit log settings
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [detection]
//! backend = "http"
//! max_slice_chars = 12000
//! threshold = 0.1
//! labels = ["person", "email", "phone number"]
//!
//! [detection.http]
//! base_url = "https://detector.internal:8443"
//! api_key = "${VEIL_DETECTOR_API_KEY}"
//!
//! [audit]
//! enabled = true
//! log_path = "./audit/redaction.log"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use crate::anonymization::config::{
    AuditConfig, DetectionConfig, DetectorBackend, HttpDetectorConfig,
};
pub use loader::{load_config, load_config_or_default, override_labels};
pub use schema::{ApplicationConfig, LoggingConfig, VeilConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
