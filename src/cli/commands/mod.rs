//! CLI command implementations
//!
//! This module contains all CLI command implementations and the input and
//! configuration plumbing they share.

pub mod detect;
pub mod init;
pub mod labels;
pub mod redact;
pub mod validate;

use crate::config::{load_config_or_default, override_labels, VeilConfig};
use anyhow::Context;
use std::io::Read;

/// Input path meaning "read from stdin"
pub const STDIN: &str = "-";

/// Read a document from a file, or from stdin when `input` is `-`
pub(crate) fn read_input(input: &str) -> anyhow::Result<String> {
    if input == STDIN {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read document from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read document: {input}"))
    }
}

/// Document id recorded in reports and the audit log
pub(crate) fn document_id(input: &str) -> &str {
    if input == STDIN {
        "stdin"
    } else {
        input
    }
}

/// Load the configuration and apply a `--labels` override
///
/// Failures are printed and turned into exit code 2 by the caller.
pub(crate) fn load_with_labels(
    config_path: &str,
    labels: Option<&str>,
) -> crate::domain::Result<VeilConfig> {
    let mut config = load_config_or_default(config_path)?;
    if let Some(labels) = labels {
        override_labels(&mut config, labels)?;
        tracing::info!(labels = config.detection.labels.len(), "Overriding labels from CLI");
    }
    Ok(config)
}
