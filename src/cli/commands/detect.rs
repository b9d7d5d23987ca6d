//! Detect command implementation
//!
//! This module implements the `detect` command, which prints the
//! deduplicated entity manifest of a document without redacting it.

use super::{load_with_labels, read_input};
use crate::anonymization::AnonymizationEngine;
use clap::Args;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Document to scan, or `-` for stdin
    #[arg(short, long)]
    pub input: String,

    /// Override the configured labels (comma-separated)
    #[arg(long)]
    pub labels: Option<String>,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting detect command");

        let config = match load_with_labels(config_path, self.labels.as_deref()) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Configuration error: {e}");
                return Ok(2);
            }
        };

        let engine = match AnonymizationEngine::from_config(&config.detection, &config.audit) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ Configuration error: {e}");
                return Ok(2);
            }
        };

        let text = read_input(&self.input)?;
        engine.initialize().await?;
        let entities = engine
            .detect_entities(&text, &config.detection.labels)
            .await?;

        tracing::info!(entities = entities.len(), "Detection finished");
        println!("{}", serde_json::to_string_pretty(&entities)?);
        Ok(0)
    }
}
