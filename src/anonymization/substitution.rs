//! Placeholder substitution
//!
//! Rewrites text so that every case-insensitive, token-bounded occurrence of
//! each entity's name is replaced by its placeholder. Entities are applied as
//! a left-to-right fold in ascending id order over the progressively
//! rewritten text:
//!
//! - a single-word entity is replaced by `[<id>_<type>]`
//! - a multi-word entity is first matched as a whole span (words joined by
//!   any run of whitespace or hyphens) and replaced by its per-word
//!   placeholders, then each word is matched on its own so isolated
//!   occurrences are redacted as `[<id>_<type>_<suffix>]`
//!
//! Entity text is always matched literally. Placeholders already present for
//! the same entity list are never rewritten, so substitution is idempotent.

use crate::anonymization::matcher::TokenPattern;
use crate::anonymization::placeholder::{self, PlaceholderScanner};
use crate::domain::{Entity, Result};
use std::collections::BTreeMap;

/// Replace every entity occurrence in `text` with its placeholder
///
/// Blank entities are skipped. An entity that never matches contributes no
/// placeholder.
///
/// # Errors
///
/// Returns [`VeilError::Pattern`](crate::domain::VeilError::Pattern) if a
/// match pattern cannot be built.
///
/// # Examples
///
/// ```
/// use veil::anonymization::substitution::anonymize;
/// use veil::domain::Entity;
///
/// let entities = vec![
///     Entity::new(1, "ACME", "organization"),
///     Entity::new(2, "Jane Doe", "person"),
/// ];
/// let redacted = anonymize("Jane Doe called acme.", &entities).unwrap();
/// assert_eq!(redacted, "[2_person_a] [2_person_b] called [1_organization].");
/// ```
pub fn anonymize(text: &str, entities: &[Entity]) -> Result<String> {
    Substitutor::new(entities).apply(text).map(|outcome| outcome.text)
}

/// Result of one substitution run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionOutcome {
    /// Redacted text
    pub text: String,

    /// Placeholders emitted per entity id
    pub placeholders_by_entity: BTreeMap<u32, usize>,

    /// Ids of blank entities that were skipped
    pub skipped: Vec<u32>,
}

impl SubstitutionOutcome {
    /// Total placeholders emitted
    pub fn placeholders_emitted(&self) -> usize {
        self.placeholders_by_entity.values().sum()
    }

    /// Ids of entities that matched nowhere in the text
    pub fn unmatched(&self) -> Vec<u32> {
        self.placeholders_by_entity
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Applies a fixed entity list to any number of texts
pub struct Substitutor<'a> {
    entities: Vec<&'a Entity>,
    scanner: PlaceholderScanner<'a>,
}

impl<'a> Substitutor<'a> {
    /// Prepare a substitution for `entities`
    pub fn new(entities: &'a [Entity]) -> Self {
        let mut ordered: Vec<&Entity> = entities.iter().collect();
        ordered.sort_by_key(|entity| entity.id);

        Self {
            entities: ordered,
            scanner: PlaceholderScanner::new(entities),
        }
    }

    /// Redact `text`
    pub fn apply(&self, text: &str) -> Result<SubstitutionOutcome> {
        let mut outcome = SubstitutionOutcome {
            text: text.to_string(),
            ..Default::default()
        };

        for entity in &self.entities {
            let words = entity.words();
            if words.is_empty() {
                tracing::warn!(
                    entity_id = entity.id,
                    entity_type = %entity.entity_type,
                    "Skipping entity with blank name"
                );
                outcome.skipped.push(entity.id);
                continue;
            }

            let (rewritten, emitted) = self.apply_entity(&outcome.text, entity, &words)?;
            outcome.text = rewritten;
            *outcome.placeholders_by_entity.entry(entity.id).or_default() += emitted;
        }

        Ok(outcome)
    }

    fn apply_entity(&self, text: &str, entity: &Entity, words: &[&str]) -> Result<(String, usize)> {
        if let [word] = words {
            let pattern = TokenPattern::word(word)?;
            return Ok(self.replace_unprotected(text, &pattern, &placeholder::single_token(entity), 1));
        }

        let (mut current, mut emitted) = self.replace_unprotected(
            text,
            &TokenPattern::span(words)?,
            &placeholder::span_token(entity, words.len()),
            words.len(),
        );

        for (idx, word) in words.iter().enumerate() {
            let (rewritten, count) = self.replace_unprotected(
                &current,
                &TokenPattern::word(word)?,
                &placeholder::word_token(entity, idx),
                1,
            );
            current = rewritten;
            emitted += count;
        }

        Ok((current, emitted))
    }

    /// Replace matches that do not overlap a known placeholder
    ///
    /// Returns the new text and the number of placeholders written, counting
    /// `per_match` for each replaced match.
    fn replace_unprotected(
        &self,
        text: &str,
        pattern: &TokenPattern,
        replacement: &str,
        per_match: usize,
    ) -> (String, usize) {
        let protected = self.scanner.protected_ranges(text);
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut emitted = 0;

        for found in pattern.find_all(text) {
            if protected
                .iter()
                .any(|range| range.start < found.end && found.start < range.end)
            {
                continue;
            }

            out.push_str(&text[last..found.start]);
            out.push_str(replacement);
            last = found.end;
            emitted += per_match;
        }

        out.push_str(&text[last..]);
        (out, emitted)
    }
}
