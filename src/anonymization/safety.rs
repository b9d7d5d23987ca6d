//! Export safety gate
//!
//! Redacted text may only leave the process when it demonstrably went through
//! redaction: at least one entity was detected, at least one placeholder is
//! present, and no word of any entity survives outside a placeholder.

use crate::anonymization::matcher::TokenPattern;
use crate::anonymization::placeholder::{self, PlaceholderScanner};
use crate::domain::{Entity, Result, VeilError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason an export was refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SafetyFailure {
    /// No entities were detected or supplied
    NoEntities,

    /// The text carries no placeholder at all
    NoPlaceholders,

    /// A word of an entity is still present in plain text
    ResidualWord {
        entity_id: u32,
        entity_type: String,
        word_index: usize,
        occurrences: usize,
    },
}

/// Outcome of checking redacted text before export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionCheck {
    /// When the check ran
    pub checked_at: DateTime<Utc>,

    /// Number of entities the text was redacted with
    pub entity_count: usize,

    /// Number of placeholder-shaped tokens in the text
    pub placeholder_count: usize,

    /// Every reason the export is unsafe; empty when safe
    pub failures: Vec<SafetyFailure>,
}

impl RedactionCheck {
    /// Check if the text may be exported
    pub fn is_safe(&self) -> bool {
        self.failures.is_empty()
    }

    /// Convert the check into an error when unsafe
    pub fn into_result(self) -> Result<Self> {
        if self.is_safe() {
            Ok(self)
        } else {
            Err(VeilError::Validation(format!(
                "Redacted text is not safe to export ({} issue(s))",
                self.failures.len()
            )))
        }
    }

    /// Format the check as a human-readable string, without PII
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Redaction safety check\n");
        summary.push_str(&format!("  Checked at: {}\n", self.checked_at));
        summary.push_str(&format!("  Entities: {}\n", self.entity_count));
        summary.push_str(&format!("  Placeholders: {}\n", self.placeholder_count));

        if self.is_safe() {
            summary.push_str("  Result: safe to export\n");
            return summary;
        }

        summary.push_str("  Result: export refused\n");
        for failure in &self.failures {
            match failure {
                SafetyFailure::NoEntities => summary.push_str("    - no entities detected\n"),
                SafetyFailure::NoPlaceholders => summary.push_str("    - no placeholder in output\n"),
                SafetyFailure::ResidualWord {
                    entity_id,
                    entity_type,
                    word_index,
                    occurrences,
                } => summary.push_str(&format!(
                    "    - entity #{entity_id} ({entity_type}) word {} remains {occurrences} time(s)\n",
                    word_index + 1
                )),
            }
        }
        summary
    }
}

/// Check redacted text against the entities it was redacted with
///
/// # Errors
///
/// Returns [`VeilError::Pattern`] if a residual-word pattern cannot be built.
pub fn verify_redaction(redacted: &str, entities: &[Entity]) -> Result<RedactionCheck> {
    let mut check = RedactionCheck {
        checked_at: Utc::now(),
        entity_count: entities.len(),
        placeholder_count: placeholder::count_placeholders(redacted),
        failures: Vec::new(),
    };

    if entities.is_empty() {
        check.failures.push(SafetyFailure::NoEntities);
    }
    if !placeholder::contains_placeholder(redacted) {
        check.failures.push(SafetyFailure::NoPlaceholders);
    }

    let protected = PlaceholderScanner::new(entities).protected_ranges(redacted);
    for entity in entities {
        for (word_index, word) in entity.words().into_iter().enumerate() {
            let occurrences = TokenPattern::word(word)?
                .find_all(redacted)
                .into_iter()
                .filter(|found| {
                    !protected
                        .iter()
                        .any(|range| range.start < found.end && found.start < range.end)
                })
                .count();

            if occurrences > 0 {
                check.failures.push(SafetyFailure::ResidualWord {
                    entity_id: entity.id,
                    entity_type: entity.entity_type.clone(),
                    word_index,
                    occurrences,
                });
            }
        }
    }

    if !check.is_safe() {
        tracing::warn!(
            entities = check.entity_count,
            placeholders = check.placeholder_count,
            issues = check.failures.len(),
            "Redaction safety check failed"
        );
    }

    Ok(check)
}
