//! Cross-slice entity aggregation
//!
//! Merges per-slice detector output into one dense, deduplicated entity list:
//!
//! 1. Provisional entities are concatenated in slice order (detector order
//!    within a slice) and numbered 1.. to give a total order.
//! 2. Duplicates by `(lowercased name, type)` are dropped; the first-seen
//!    entity wins and survivors keep their relative order.
//! 3. Survivors are renumbered densely from 1.
//!
//! No score filtering happens here; thresholding belongs to the detector call.

use crate::anonymization::detector::DetectedSpan;
use crate::domain::Entity;
use std::collections::HashSet;

/// Accumulates detector output slice by slice
///
/// # Examples
///
/// ```
/// use veil::anonymization::aggregator::EntityAggregator;
/// use veil::anonymization::detector::DetectedSpan;
///
/// let mut aggregator = EntityAggregator::new();
/// aggregator.push_slice(vec![DetectedSpan::new("Jane", "person", 0.9)]);
/// aggregator.push_slice(vec![DetectedSpan::new("JANE", "person", 0.8)]);
///
/// let entities = aggregator.finish();
/// assert_eq!(entities.len(), 1);
/// assert_eq!(entities[0].name, "Jane");
/// ```
#[derive(Debug, Default)]
pub struct EntityAggregator {
    provisional: Vec<Entity>,
    slices: usize,
}

impl EntityAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the detector output for the next slice
    pub fn push_slice(&mut self, spans: Vec<DetectedSpan>) {
        for span in spans {
            let provisional_id = self.next_provisional_id();
            self.provisional
                .push(Entity::new(provisional_id, span.text, span.label));
        }
        self.slices += 1;
    }

    fn next_provisional_id(&self) -> u32 {
        u32::try_from(self.provisional.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }

    /// Number of provisional entities collected so far
    pub fn provisional_count(&self) -> usize {
        self.provisional.len()
    }

    /// Number of slices pushed so far
    pub fn slice_count(&self) -> usize {
        self.slices
    }

    /// Provisional entities in concatenation order, before deduplication
    pub fn provisional(&self) -> &[Entity] {
        &self.provisional
    }

    /// Deduplicate and renumber
    pub fn finish(self) -> Vec<Entity> {
        deduplicate(self.provisional)
    }
}

/// Drop later duplicates by `(lowercased name, type)` and renumber 1..N
///
/// Stable: the first occurrence of each key is kept and survivors are not
/// reordered. Applying it twice yields the same list as applying it once.
pub fn deduplicate(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();

    entities
        .into_iter()
        .filter(|entity| seen.insert(entity.dedup_key()))
        .zip(1u32..)
        .map(|(entity, id)| Entity { id, ..entity })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, label: &str) -> DetectedSpan {
        DetectedSpan::new(text, label, 0.5)
    }

    #[test]
    fn test_empty_aggregation() {
        let aggregator = EntityAggregator::new();
        assert!(aggregator.finish().is_empty());
    }

    #[test]
    fn test_provisional_ids_span_slices() {
        let mut aggregator = EntityAggregator::new();
        aggregator.push_slice(vec![span("a", "x"), span("b", "x")]);
        aggregator.push_slice(vec![span("c", "x")]);

        let ids: Vec<u32> = aggregator.provisional().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(aggregator.slice_count(), 2);
    }

    #[test]
    fn test_first_seen_wins_case_insensitively() {
        let mut aggregator = EntityAggregator::new();
        aggregator.push_slice(vec![span("John Smith", "person"), span("ACME", "organization")]);
        aggregator.push_slice(vec![span("john smith", "person"), span("Berlin", "location")]);

        let entities = aggregator.finish();
        assert_eq!(
            entities,
            vec![
                Entity::new(1, "John Smith", "person"),
                Entity::new(2, "ACME", "organization"),
                Entity::new(3, "Berlin", "location"),
            ]
        );
    }

    #[test]
    fn test_same_name_different_type_kept() {
        let entities = deduplicate(vec![
            Entity::new(1, "Jordan", "person"),
            Entity::new(2, "Jordan", "location"),
        ]);
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_type_comparison_is_exact() {
        let entities = deduplicate(vec![
            Entity::new(1, "Jordan", "person"),
            Entity::new(2, "Jordan", "Person"),
        ]);
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_dense_renumbering() {
        let entities = deduplicate(vec![
            Entity::new(10, "a", "x"),
            Entity::new(11, "A", "x"),
            Entity::new(12, "b", "x"),
            Entity::new(13, "c", "x"),
            Entity::new(14, "B", "x"),
        ]);
        let ids: Vec<u32> = entities.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let once = deduplicate(vec![
            Entity::new(1, "Jane", "person"),
            Entity::new(2, "JANE", "person"),
            Entity::new(3, "Doe", "person"),
        ]);
        let twice = deduplicate(once.clone());
        assert_eq!(once, twice);
    }
}
