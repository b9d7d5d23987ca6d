//! Redaction reporting
//!
//! Summarizes one or more redacted documents for the console or as JSON.
//! Reports never contain entity text: entities are described by id, type
//! and length only.

use crate::anonymization::models::RedactedDocument;
use crate::anonymization::placeholder;
use crate::anonymization::safety::RedactionCheck;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of entity samples kept in a report
const MAX_SAMPLES: usize = 20;

/// Redaction report with entity statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionReport {
    /// Whether the text was left unchanged (dry run)
    pub dry_run: bool,

    /// Total documents processed
    pub total_documents: usize,

    /// Total entities across documents
    pub total_entities: usize,

    /// Total placeholders written
    pub total_placeholders: usize,

    /// Entities by category label
    pub entities_by_type: BTreeMap<String, usize>,

    /// Entity samples
    pub samples: Vec<EntitySample>,

    /// Safety check outcomes, one per checked document
    pub safety: Vec<RedactionCheck>,

    /// Warnings
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// Description of one entity without its text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySample {
    /// Document the entity belongs to
    pub document_id: String,

    /// Entity id
    pub id: u32,

    /// Category label
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Length of the entity text in characters
    pub chars: usize,

    /// Number of words
    pub words: usize,

    /// Placeholder written for the first word
    pub placeholder: String,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Total slices sent to the detector
    pub total_slices: usize,

    /// Documents with PII detected
    pub documents_with_pii: usize,

    /// Documents without PII
    pub documents_without_pii: usize,
}

impl RedactionReport {
    /// Create a new empty report
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Add the results of a redacted document
    pub fn add_document(&mut self, document: &RedactedDocument) {
        self.total_documents += 1;
        self.total_entities += document.entities.len();
        self.total_placeholders += document.stats.placeholders_emitted;
        self.stats.total_processing_time_ms += document.processing_time_ms;
        self.stats.total_slices += document.stats.slices;

        if document.has_entities() {
            self.stats.documents_with_pii += 1;
        } else {
            self.stats.documents_without_pii += 1;
        }

        for (entity_type, count) in &document.stats.entities_by_type {
            *self.entities_by_type.entry(entity_type.clone()).or_insert(0) += count;
        }

        for entity in &document.entities {
            if self.samples.len() >= MAX_SAMPLES {
                break;
            }
            let words = entity.words().len();
            let placeholder = if words > 1 {
                placeholder::word_token(entity, 0)
            } else {
                placeholder::single_token(entity)
            };
            self.samples.push(EntitySample {
                document_id: document.document_id.clone(),
                id: entity.id,
                entity_type: entity.entity_type.clone(),
                chars: entity.name.chars().count(),
                words,
                placeholder,
            });
        }

        if document.stats.unmatched_entities > 0 {
            self.add_warning(format!(
                "{}: {} entit(ies) not found in text during substitution",
                document.document_id, document.stats.unmatched_entities
            ));
        }
        if document.stats.skipped_entities > 0 {
            self.add_warning(format!(
                "{}: {} blank entit(ies) skipped",
                document.document_id, document.stats.skipped_entities
            ));
        }

        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.total_documents as u64;
    }

    /// Record a safety check
    pub fn add_safety_check(&mut self, check: RedactionCheck) {
        self.safety.push(check);
    }

    /// Check if every recorded safety check passed
    pub fn is_safe(&self) -> bool {
        self.safety.iter().all(RedactionCheck::is_safe)
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        if self.dry_run {
            output.push_str("                  REDACTION DRY-RUN REPORT                     \n");
        } else {
            output.push_str("                      REDACTION REPORT                         \n");
        }
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Documents Processed:    {}\n", self.total_documents));
        output.push_str(&format!(
            "  Documents with PII:     {}\n",
            self.stats.documents_with_pii
        ));
        output.push_str(&format!("  Entities Detected:      {}\n", self.total_entities));
        output.push_str(&format!("  Placeholders Written:   {}\n", self.total_placeholders));
        output.push_str(&format!("  Slices Detected:        {}\n", self.stats.total_slices));
        output.push_str(&format!(
            "  Avg Processing Time:    {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if !self.entities_by_type.is_empty() {
            output.push_str("🔍 ENTITIES BY TYPE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut types: Vec<_> = self.entities_by_type.iter().collect();
            types.sort_by(|a, b| b.1.cmp(a.1));

            for (entity_type, count) in types {
                output.push_str(&format!("  {:30} {:>5}\n", entity_type, count));
            }
            output.push('\n');
        }

        if !self.samples.is_empty() {
            output.push_str("📝 ENTITIES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for sample in self.samples.iter().take(10) {
                output.push_str(&format!(
                    "  #{:<4} {:24} {:>3} word(s) {:>4} chars  {}\n",
                    sample.id, sample.entity_type, sample.words, sample.chars, sample.placeholder
                ));
            }
            output.push('\n');
        }

        for check in &self.safety {
            output.push_str(&check.format_summary());
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {}\n", warning));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::RedactionStats;
    use crate::anonymization::safety::verify_redaction;
    use crate::domain::Entity;
    use std::collections::BTreeMap;

    fn document(entities: Vec<Entity>, placeholders: usize) -> RedactedDocument {
        let mut entities_by_type = BTreeMap::new();
        for entity in &entities {
            *entities_by_type.entry(entity.entity_type.clone()).or_insert(0) += 1;
        }
        RedactedDocument::new(
            "doc",
            String::new(),
            entities,
            RedactionStats {
                slices: 1,
                placeholders_emitted: placeholders,
                entities_by_type,
                ..Default::default()
            },
            10,
        )
    }

    #[test]
    fn test_report_creation() {
        let report = RedactionReport::new(true);
        assert!(report.dry_run);
        assert_eq!(report.total_documents, 0);
        assert!(report.samples.is_empty());
        assert!(report.is_safe());
    }

    #[test]
    fn test_add_document_without_pii() {
        let mut report = RedactionReport::new(false);
        report.add_document(&document(vec![], 0));

        assert_eq!(report.total_documents, 1);
        assert_eq!(report.stats.documents_without_pii, 1);
        assert_eq!(report.stats.avg_processing_time_ms, 10);
    }

    #[test]
    fn test_add_document_with_pii() {
        let mut report = RedactionReport::new(false);
        report.add_document(&document(
            vec![
                Entity::new(1, "Jane Doe", "person"),
                Entity::new(2, "jane@example.com", "email"),
            ],
            3,
        ));

        assert_eq!(report.total_entities, 2);
        assert_eq!(report.total_placeholders, 3);
        assert_eq!(report.entities_by_type["person"], 1);
        assert_eq!(report.samples[0].placeholder, "[1_person_a]");
        assert_eq!(report.samples[1].placeholder, "[2_email]");
        assert_eq!(report.samples[0].chars, 8);
    }

    #[test]
    fn test_console_output_has_no_pii() {
        let mut report = RedactionReport::new(true);
        report.add_document(&document(vec![Entity::new(1, "Jane Doe", "person")], 2));

        let output = report.format_console();
        assert!(output.contains("REDACTION DRY-RUN REPORT"));
        assert!(output.contains("Entities Detected:      1"));
        assert!(!output.contains("Jane"));
    }

    #[test]
    fn test_unsafe_check_marks_report() {
        let mut report = RedactionReport::new(false);
        let entities = vec![Entity::new(1, "Jane", "person")];
        report.add_safety_check(verify_redaction("Jane", &entities).unwrap());
        assert!(!report.is_safe());
    }
}
