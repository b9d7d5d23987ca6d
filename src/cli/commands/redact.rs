//! Redact command implementation
//!
//! This module implements the `redact` command: detect PII in a document (or
//! take a supplied entity manifest), replace it with placeholders, run the
//! export safety gate and write the redacted text.

use super::{document_id, load_with_labels, read_input};
use crate::anonymization::models::RedactedDocument;
use crate::anonymization::{verify_redaction, AnonymizationEngine, RedactionReport};
use crate::domain::Entity;
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Document to redact, or `-` for stdin
    #[arg(short, long)]
    pub input: String,

    /// Where to write the redacted text (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the configured labels (comma-separated)
    #[arg(long)]
    pub labels: Option<String>,

    /// Write the entity manifest as JSON to this file
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Skip detection and redact with this entity manifest (JSON)
    #[arg(long, value_name = "FILE")]
    pub entities: Option<PathBuf>,

    /// Detect and report without writing redacted text
    #[arg(long)]
    pub dry_run: bool,

    /// Refuse to write output that fails the export safety check
    #[arg(long)]
    pub require_safe: bool,

    /// Write the redaction report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl RedactArgs {
    /// Execute the redact command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, dry_run = self.dry_run, "Starting redact command");

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
        let doc_id = document_id(&self.input);

        let document = match &self.entities {
            Some(path) => {
                let entities = read_manifest(path)?;
                tracing::info!(entities = entities.len(), "Using supplied entity manifest");
                engine.redact_with_entities(doc_id, &text, entities)?
            }
            None => {
                engine.initialize().await?;
                engine
                    .anonymize_document(doc_id, &text, &config.detection.labels)
                    .await?
            }
        };

        let check = verify_redaction(&document.redacted_text, &document.entities)?;
        let safe = check.is_safe();

        let mut report = RedactionReport::new(self.dry_run);
        report.add_document(&document);
        report.add_safety_check(check);

        if let Some(path) = &self.report {
            report
                .write_to_file(path)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
        }

        if let Some(path) = &self.manifest {
            write_manifest(path, &document)?;
        }

        if self.dry_run {
            println!("{}", report.format_console());
            return Ok(0);
        }

        if self.require_safe && !safe {
            tracing::warn!(document_id = %doc_id, "Redacted output failed the safety check");
            eprintln!("{}", report.format_console());
            eprintln!("❌ Redacted output is not safe to export; nothing written");
            return Ok(3);
        }

        match &self.output {
            Some(path) => {
                std::fs::write(path, &document.redacted_text)
                    .with_context(|| format!("Failed to write output: {}", path.display()))?;
                eprintln!("{}", report.format_console());
                eprintln!("✅ Redacted text written to {}", path.display());
            }
            None => {
                print!("{}", document.redacted_text);
            }
        }

        Ok(0)
    }
}

fn read_manifest(path: &Path) -> anyhow::Result<Vec<Entity>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entity manifest: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid entity manifest: {}", path.display()))
}

fn write_manifest(path: &Path, document: &RedactedDocument) -> anyhow::Result<()> {
    let json = document.manifest_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write entity manifest: {}", path.display()))
}
