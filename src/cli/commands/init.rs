//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "veil.toml")]
    pub output: String,

    /// Include the HTTP detector, audit and logging sections with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Veil configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Pick the labels to redact (veil labels)");
                println!("  3. For a remote detector, set VEIL_DETECTOR_API_KEY in .env");
                println!("  4. Validate configuration: veil validate-config");
                println!("  5. Redact a document: veil redact --input notes.txt");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Veil Configuration File
# PII redaction with typed placeholders

[application]
log_level = "info"

[detection]
backend = "patterns"  # patterns | http
max_slice_chars = 12000
threshold = 0.1
concurrency = 1
labels = [
    "person",
    "organization",
    "phone number",
    "email",
    "address",
    "iban",
    "credit card number",
    "social security number",
]

[audit]
enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Veil Configuration File
# PII redaction with typed placeholders
#
# Every value below is optional; missing values fall back to defaults.
# Any value can also be set with a VEIL_<SECTION>_<KEY> environment
# variable, e.g. VEIL_DETECTION_THRESHOLD=0.3.

[application]
# trace | debug | info | warn | error
log_level = "info"

[detection]
# patterns: built-in regex detector
# http: remote span-detection service (see [detection.http])
backend = "patterns"

# Longest slice, in characters, sent to the detector in one call
max_slice_chars = 12000

# Minimum detector confidence for a span to be kept
threshold = 0.1

# Slices detected in parallel; results are always merged in text order
concurrency = 1

# Categories to redact (run `veil labels` for the full catalog)
labels = [
    "person",
    "organization",
    "phone number",
    "email",
    "address",
    "iban",
    "credit card number",
    "social security number",
]

# Custom pattern library for the patterns backend
# pattern_library = "./patterns/pii_patterns.toml"

# [detection.http]
# base_url = "https://detector.internal:8443"
# api_key = "${VEIL_DETECTOR_API_KEY}"
# timeout_seconds = 60
# health_check = true

[audit]
# Append-only log of redactions; entity names are stored as SHA-256 hashes
enabled = false
log_path = "./audit/redaction.log"
json_format = true

[logging]
# JSON file logs in addition to console output
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VeilConfig;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "veil.toml".to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.output, "veil.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let config: VeilConfig = toml::from_str(&InitArgs::generate_minimal_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.labels.len(), 8);
    }

    #[test]
    fn test_generate_config_with_examples() {
        let content = InitArgs::generate_config_with_examples();
        assert!(content.contains("[detection.http]"));
        let config: VeilConfig = toml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.local_rotation, "daily");
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("veil.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("veil.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().into_owned(),
            with_examples: true,
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&path).unwrap().contains("[detection]"));
    }
}
