//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use veil::config::{load_config, load_config_or_default, override_labels, DetectorBackend};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for var in [
        "VEIL_APPLICATION_LOG_LEVEL",
        "VEIL_DETECTION_BACKEND",
        "VEIL_DETECTION_THRESHOLD",
        "VEIL_DETECTION_CONCURRENCY",
        "VEIL_DETECTION_LABELS",
        "VEIL_DETECTION_HTTP_BASE_URL",
        "VEIL_DETECTION_HTTP_API_KEY",
        "VEIL_AUDIT_ENABLED",
        "TEST_VEIL_DETECTOR_KEY",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_VEIL_DETECTOR_KEY", "sk-test-123");

    let file = write_config(
        r#"
[application]
log_level = "debug"

[detection]
backend = "http"
max_slice_chars = 4000
threshold = 0.35
concurrency = 4
labels = ["person", "email"]

[detection.http]
base_url = "https://detector.example.com"
api_key = "${TEST_VEIL_DETECTOR_KEY}"
timeout_seconds = 30

[audit]
enabled = true
log_path = "./audit/test.log"
json_format = false

[logging]
local_enabled = false
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.detection.backend, DetectorBackend::Http);
    assert_eq!(config.detection.max_slice_chars, 4000);
    assert_eq!(config.detection.concurrency, 4);
    assert_eq!(config.detection.labels, vec!["person", "email"]);

    let http = config.detection.http.as_ref().unwrap();
    assert_eq!(http.base_url, "https://detector.example.com");
    assert_eq!(http.timeout_seconds, 30);
    assert!(http.api_key.is_some());

    assert!(config.audit.enabled);
    assert!(!config.audit.json_format);
    assert_eq!(config.logging.local_rotation, "hourly");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_reference_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[detection.http]
base_url = "https://detector.example.com"
api_key = "${TEST_VEIL_DETECTOR_KEY}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_VEIL_DETECTOR_KEY"));
}

#[test]
fn test_env_overrides_take_precedence() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("VEIL_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("VEIL_DETECTION_THRESHOLD", "0.5");
    std::env::set_var("VEIL_DETECTION_LABELS", "iban, email");

    let file = write_config(
        r#"
[application]
log_level = "info"

[detection]
threshold = 0.2
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert!((config.detection.threshold - 0.5).abs() < f32::EPSILON);
    assert_eq!(config.detection.labels, vec!["iban", "email"]);

    cleanup_env_vars();
}

#[test]
fn test_env_can_switch_to_http_backend() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("VEIL_DETECTION_BACKEND", "http");
    std::env::set_var("VEIL_DETECTION_HTTP_BASE_URL", "http://localhost:9000");

    let config = load_config_or_default("/nonexistent/veil.toml").unwrap();
    assert_eq!(config.detection.backend, DetectorBackend::Http);
    assert_eq!(
        config.detection.http.as_ref().unwrap().base_url,
        "http://localhost:9000"
    );

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_fails() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("VEIL_DETECTION_CONCURRENCY", "many");

    assert!(load_config_or_default("/nonexistent/veil.toml").is_err());

    cleanup_env_vars();
}

#[test]
fn test_http_backend_without_endpoint_is_invalid() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[detection]\nbackend = \"http\"\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_missing_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let mut config = load_config_or_default("/nonexistent/veil.toml").unwrap();
    assert_eq!(config.detection.backend, DetectorBackend::Patterns);
    assert_eq!(config.detection.max_slice_chars, 12_000);
    assert!(!config.audit.enabled);

    override_labels(&mut config, "person,person, email").unwrap();
    assert_eq!(config.detection.labels, vec!["person", "email"]);
}
