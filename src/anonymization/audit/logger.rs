//! Audit logger for redaction runs

use crate::anonymization::models::RedactedDocument;
use crate::domain::{Entity, Result, VeilError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry<'a> {
    timestamp: String,
    document_id: &'a str,
    entities_count: usize,
    placeholders_emitted: usize,
    slices: usize,
    processing_time_ms: u64,
    entities: Vec<AuditEntity<'a>>,
}

/// Audit entity entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditEntity<'a> {
    id: u32,
    #[serde(rename = "type")]
    entity_type: &'a str,
    /// SHA-256 hash of the entity name (never log plaintext PII)
    name_hash: String,
}

/// Append-only audit log of redaction runs
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                VeilError::Audit(format!(
                    "Failed to create audit log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the audit log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Record a redacted document
    pub fn log_redaction(&self, document: &RedactedDocument) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: document.timestamp.to_rfc3339(),
            document_id: &document.document_id,
            entities_count: document.entities.len(),
            placeholders_emitted: document.stats.placeholders_emitted,
            slices: document.stats.slices,
            processing_time_ms: document.processing_time_ms,
            entities: document.entities.iter().map(audit_entity).collect(),
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry<'_>) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry)
                .map_err(|e| VeilError::Audit(format!("Failed to serialize audit entry: {e}")))?
        } else {
            format!(
                "[{}] Document: {} | Entities: {} | Placeholders: {} | Slices: {} | Time: {}ms",
                entry.timestamp,
                entry.document_id,
                entry.entities_count,
                entry.placeholders_emitted,
                entry.slices,
                entry.processing_time_ms
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                VeilError::Audit(format!(
                    "Failed to open audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })?;

        writeln!(file, "{line}")
            .map_err(|e| VeilError::Audit(format!("Failed to write audit entry: {e}")))
    }
}

fn audit_entity(entity: &Entity) -> AuditEntity<'_> {
    AuditEntity {
        id: entity.id,
        entity_type: &entity.entity_type,
        name_hash: hash_pii_value(&entity.name),
    }
}

/// Hash a PII value using SHA-256
pub fn hash_pii_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}
