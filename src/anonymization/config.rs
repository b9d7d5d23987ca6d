//! Detection and audit configuration

use crate::anonymization::detector::DEFAULT_THRESHOLD;
use crate::anonymization::labels::{default_labels, parse_label_list};
use crate::anonymization::segmenter::DEFAULT_MAX_SLICE_CHARS;
use crate::config::{secret_string, SecretString};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Span detector implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectorBackend {
    /// Built-in regex pattern library
    #[default]
    Patterns,
    /// Remote detection service
    Http,
}

impl std::str::FromStr for DetectorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "patterns" => Ok(Self::Patterns),
            "http" => Ok(Self::Http),
            _ => anyhow::bail!("Invalid detection backend '{}'. Must be one of: patterns, http", s),
        }
    }
}

impl std::fmt::Display for DetectorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patterns => write!(f, "patterns"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Which detector to load
    #[serde(default)]
    pub backend: DetectorBackend,

    /// Maximum slice length in characters
    #[serde(default = "default_max_slice_chars")]
    pub max_slice_chars: usize,

    /// Minimum detector score
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Number of slices detected concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Category labels requested from the detector
    #[serde(default = "default_labels")]
    pub labels: Vec<String>,

    /// Path to a custom pattern library TOML file
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Remote detection service (required if backend = "http")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpDetectorConfig>,
}

fn default_max_slice_chars() -> usize {
    DEFAULT_MAX_SLICE_CHARS
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_concurrency() -> usize {
    1
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            backend: DetectorBackend::default(),
            max_slice_chars: default_max_slice_chars(),
            threshold: default_threshold(),
            concurrency: default_concurrency(),
            labels: default_labels(),
            pattern_library: None,
            http: None,
        }
    }
}

impl DetectionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_slice_chars == 0 {
            anyhow::bail!("detection.max_slice_chars must be > 0");
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            anyhow::bail!(
                "detection.threshold must be between 0.0 and 1.0, got {}",
                self.threshold
            );
        }

        if self.concurrency == 0 || self.concurrency > 64 {
            anyhow::bail!("detection.concurrency must be between 1 and 64");
        }

        if self.labels.iter().all(|label| label.trim().is_empty()) {
            anyhow::bail!("detection.labels cannot be empty");
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        match (self.backend, &self.http) {
            (DetectorBackend::Http, Some(http)) => {
                http.validate().context("Invalid detection.http configuration")?
            }
            (DetectorBackend::Http, None) => {
                anyhow::bail!("detection.http configuration is required when backend = 'http'")
            }
            (DetectorBackend::Patterns, _) => {}
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_DETECTION_BACKEND") {
            self.backend = val.parse()?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_MAX_SLICE_CHARS") {
            self.max_slice_chars = val
                .parse()
                .context("Invalid VEIL_DETECTION_MAX_SLICE_CHARS value")?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_THRESHOLD") {
            self.threshold = val
                .parse()
                .context("Invalid VEIL_DETECTION_THRESHOLD value")?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_CONCURRENCY") {
            self.concurrency = val
                .parse()
                .context("Invalid VEIL_DETECTION_CONCURRENCY value")?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_LABELS") {
            self.labels = parse_label_list(&val);
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_HTTP_BASE_URL") {
            self.http.get_or_insert_with(HttpDetectorConfig::default).base_url = val;
        }

        if let Some(ref mut http) = self.http {
            http.apply_env_overrides()?;
        }

        Ok(())
    }
}

/// Remote detection service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpDetectorConfig {
    /// Base URL of the detection service
    pub base_url: String,

    /// Bearer token
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Probe `/health` before the detector is reported ready
    #[serde(default = "default_health_check")]
    pub health_check: bool,
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_health_check() -> bool {
    true
}

impl Default for HttpDetectorConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            health_check: default_health_check(),
        }
    }
}

impl HttpDetectorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        if self.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be > 0");
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_DETECTION_HTTP_API_KEY") {
            self.api_key = Some(secret_string(val));
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_HTTP_TIMEOUT_SECONDS") {
            self.timeout_seconds = val
                .parse()
                .context("Invalid VEIL_DETECTION_HTTP_TIMEOUT_SECONDS value")?;
        }

        if let Ok(val) = std::env::var("VEIL_DETECTION_HTTP_HEALTH_CHECK") {
            self.health_check = val
                .parse()
                .context("Invalid VEIL_DETECTION_HTTP_HEALTH_CHECK value")?;
        }

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_enabled() -> bool {
    false
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/redaction.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when audit is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("VEIL_AUDIT_ENABLED") {
            self.enabled = val.parse().context("Invalid VEIL_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("VEIL_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid VEIL_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_config() {
        let config = DetectionConfig::default();
        assert_eq!(config.backend, DetectorBackend::Patterns);
        assert_eq!(config.max_slice_chars, 12_000);
        assert!((config.threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.labels, default_labels());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_audit_default() {
        let config = AuditConfig::default();
        assert!(!config.enabled);
        assert!(config.json_format);
        assert!(config.validate().is_ok());
    }

    #[test_case("patterns", DetectorBackend::Patterns ; "patterns")]
    #[test_case("HTTP", DetectorBackend::Http ; "http uppercase")]
    fn test_backend_parse(input: &str, expected: DetectorBackend) {
        assert_eq!(input.parse::<DetectorBackend>().unwrap(), expected);
    }

    #[test]
    fn test_backend_parse_invalid() {
        assert!("model".parse::<DetectorBackend>().is_err());
    }

    #[test]
    fn test_zero_slice_length_rejected() {
        let config = DetectionConfig {
            max_slice_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_range() {
        let config = DetectionConfig {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_backend_requires_section() {
        let config = DetectionConfig {
            backend: DetectorBackend::Http,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("detection.http"));
    }

    #[test]
    fn test_http_base_url_scheme() {
        let config = HttpDetectorConfig {
            base_url: "detector.local".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = HttpDetectorConfig {
            base_url: "http://detector.local".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_detection_section() {
        let toml_str = r#"
backend = "http"
threshold = 0.3
labels = ["person", "email"]

[http]
base_url = "https://detector.example.com"
api_key = "secret-key"
"#;
        let config: DetectionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend, DetectorBackend::Http);
        assert_eq!(config.labels, vec!["person", "email"]);
        assert_eq!(config.max_slice_chars, 12_000);

        let http = config.http.as_ref().unwrap();
        assert_eq!(http.timeout_seconds, 60);
        assert!(http.api_key.is_some());
        assert!(config.validate().is_ok());
    }
}
