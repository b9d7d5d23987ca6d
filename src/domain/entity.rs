//! Entity model
//!
//! An [`Entity`] is the unit of redaction: one deduplicated PII span text
//! paired with its category label, carrying the identifier that placeholders
//! encode. Identifiers are only meaningful within a single run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A deduplicated, identified PII span within one document run
///
/// Serializes to the manifest form `{"id": 1, "name": "Jane Doe", "type": "person"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Dense positive identifier, 1..N within one run
    pub id: u32,

    /// Exact span text as detected
    pub name: String,

    /// Category label, drawn from the caller's open label set
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl Entity {
    /// Create a new entity
    pub fn new(id: u32, name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            entity_type: entity_type.into(),
        }
    }

    /// Deduplication key: lowercased name plus exact type
    pub fn dedup_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.entity_type.clone())
    }

    /// Split the name into words on whitespace and hyphens, dropping empty tokens
    pub fn words(&self) -> Vec<&str> {
        self.name
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|w| !w.trim().is_empty())
            .collect()
    }

    /// Check if the entity has no usable text
    pub fn is_blank(&self) -> bool {
        self.words().is_empty()
    }
}

/// Display never prints the PII text itself
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({}, {} chars)", self.id, self.entity_type, self.name.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_on_whitespace_and_hyphen() {
        let entity = Entity::new(1, "Anna-Lena  Müller Schmidt", "person");
        assert_eq!(entity.words(), vec!["Anna", "Lena", "Müller", "Schmidt"]);
    }

    #[test]
    fn test_words_drop_empty_tokens() {
        let entity = Entity::new(1, " - Jane -- Doe ", "person");
        assert_eq!(entity.words(), vec!["Jane", "Doe"]);
    }

    #[test]
    fn test_blank_entity() {
        assert!(Entity::new(1, "", "person").is_blank());
        assert!(Entity::new(1, "  -  ", "person").is_blank());
        assert!(!Entity::new(1, "x", "person").is_blank());
    }

    #[test]
    fn test_dedup_key_lowercases_name_only() {
        let entity = Entity::new(1, "John SMITH", "Person");
        assert_eq!(
            entity.dedup_key(),
            ("john smith".to_string(), "Person".to_string())
        );
    }

    #[test]
    fn test_manifest_serialization() {
        let entity = Entity::new(2, "Jane Doe", "person");
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 2, "name": "Jane Doe", "type": "person"})
        );

        let back: Entity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_display_hides_name() {
        let entity = Entity::new(7, "Jane Doe", "person");
        let shown = entity.to_string();
        assert!(!shown.contains("Jane"));
        assert!(shown.contains("#7"));
    }
}
