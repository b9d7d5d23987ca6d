//! Redacted document data models

use crate::anonymization::substitution::SubstitutionOutcome;
use crate::domain::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-document redaction statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionStats {
    /// Characters in the input text
    pub input_chars: usize,

    /// Slices the text was split into
    pub slices: usize,

    /// Detector results before deduplication
    pub provisional_entities: usize,

    /// Entities after deduplication
    pub entities: usize,

    /// Placeholder tokens written into the text
    pub placeholders_emitted: usize,

    /// Entities that matched nowhere during substitution
    pub unmatched_entities: usize,

    /// Blank entities skipped during substitution
    pub skipped_entities: usize,

    /// Entity count per category label
    pub entities_by_type: BTreeMap<String, usize>,
}

impl RedactionStats {
    /// Fill the entity and substitution figures from a finished run
    pub fn record_substitution(&mut self, entities: &[Entity], outcome: &SubstitutionOutcome) {
        self.entities = entities.len();
        self.placeholders_emitted = outcome.placeholders_emitted();
        self.unmatched_entities = outcome.unmatched().len();
        self.skipped_entities = outcome.skipped.len();

        self.entities_by_type.clear();
        for entity in entities {
            *self
                .entities_by_type
                .entry(entity.entity_type.clone())
                .or_insert(0) += 1;
        }
    }
}

/// A redacted document together with its entity manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactedDocument {
    /// Caller-supplied document identifier (file name, "stdin", ...)
    pub document_id: String,

    /// Text with every entity occurrence replaced by its placeholder
    pub redacted_text: String,

    /// Entity manifest, ids 1..N
    pub entities: Vec<Entity>,

    /// Run statistics
    pub stats: RedactionStats,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,

    /// When the redaction finished
    pub timestamp: DateTime<Utc>,
}

impl RedactedDocument {
    /// Create a new redacted document
    pub fn new(
        document_id: impl Into<String>,
        redacted_text: String,
        entities: Vec<Entity>,
        stats: RedactionStats,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            redacted_text,
            entities,
            stats,
            processing_time_ms,
            timestamp: Utc::now(),
        }
    }

    /// Get total number of entities
    pub fn total_entities(&self) -> usize {
        self.entities.len()
    }

    /// Check if any PII was detected
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Entity manifest as pretty JSON
    pub fn manifest_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entities)
    }
}
