//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Veil configuration file.

use crate::config::{load_config, DetectorBackend};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(_) => {
                let detection = &config.detection;
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Detector Backend: {}", detection.backend);
                if detection.backend == DetectorBackend::Http {
                    if let Some(ref http) = detection.http {
                        println!("  Detector Endpoint: {}", http.base_url);
                        println!(
                            "  Detector API Key: {}",
                            if http.api_key.is_some() { "set" } else { "not set" }
                        );
                    }
                }
                if let Some(ref library) = detection.pattern_library {
                    println!("  Pattern Library: {}", library.display());
                }
                println!("  Max Slice Chars: {}", detection.max_slice_chars);
                println!("  Threshold: {}", detection.threshold);
                println!("  Concurrency: {}", detection.concurrency);
                println!("  Labels: {}", detection.labels.join(", "));
                println!(
                    "  Audit Log: {}",
                    if config.audit.enabled {
                        config.audit.log_path.display().to_string()
                    } else {
                        "disabled".to_string()
                    }
                );
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[detection]\nmax_slice_chars = 500").unwrap();
        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_validate_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[detection]\nmax_slice_chars = 0").unwrap();
        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("/nonexistent/veil.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
