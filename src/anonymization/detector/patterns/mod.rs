//! Pattern library for regex-based span detection
//!
//! A library is a TOML document of named pattern groups:
//!
//! ```toml
//! [patterns.email]
//! labels = ["email", "email address"]
//! confidence = 0.95
//! patterns = ['[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}']
//! ```
//!
//! A pattern may define a named capture group `span`; when present only that
//! group is reported as the detected text.

use crate::domain::DetectorError;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the optional capture group that narrows a match
pub const SPAN_GROUP: &str = "span";

/// Pattern group definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Labels this group answers to; the first one is reported
    pub labels: Vec<String>,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Regex patterns for this group
    pub patterns: Vec<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Compiled regex
    pub regex: Regex,
    /// Label reported for matches
    pub label: String,
    /// Every label that selects this pattern
    pub aliases: Vec<String>,
    /// Confidence score
    pub confidence: f32,
}

impl CompiledPattern {
    /// Check if this pattern serves any of the requested labels
    pub fn serves(&self, labels: &[String]) -> bool {
        labels
            .iter()
            .any(|wanted| self.aliases.iter().any(|a| a.eq_ignore_ascii_case(wanted)))
    }

    /// Label to report for a request: the requested spelling if it selected us
    pub fn reported_label<'a>(&'a self, labels: &'a [String]) -> &'a str {
        labels
            .iter()
            .find(|wanted| self.aliases.iter().any(|a| a.eq_ignore_ascii_case(wanted)))
            .map(String::as_str)
            .unwrap_or(&self.label)
    }
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Pattern registry for span detection
///
/// Groups are kept in name order so detection output is deterministic.
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Create a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DetectorError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            DetectorError::InvalidPattern(format!(
                "Failed to read pattern library {}: {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self, DetectorError> {
        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            DetectorError::InvalidPattern(format!("Failed to parse pattern library TOML: {e}"))
        })?;

        let mut patterns = Vec::new();

        for (name, def) in library.patterns {
            let label = def.labels.first().cloned().ok_or_else(|| {
                DetectorError::InvalidPattern(format!("Pattern group '{name}' has no labels"))
            })?;

            if !(0.0..=1.0).contains(&def.confidence) {
                return Err(DetectorError::InvalidPattern(format!(
                    "Pattern group '{name}' has confidence {} outside 0.0-1.0",
                    def.confidence
                )));
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).map_err(|e| {
                    DetectorError::InvalidPattern(format!(
                        "Invalid regex in pattern '{name}': {pattern_str}: {e}"
                    ))
                })?;

                patterns.push(CompiledPattern {
                    regex,
                    label: label.clone(),
                    aliases: def.labels.clone(),
                    confidence: def.confidence,
                });
            }
        }

        Ok(Self { patterns })
    }

    /// Create a registry with the built-in patterns
    pub fn default_patterns() -> Result<Self, DetectorError> {
        let default_toml = include_str!("../../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns serving a label
    pub fn patterns_for_label(&self, label: &str) -> Vec<&CompiledPattern> {
        let wanted = [label.to_string()];
        self.patterns.iter().filter(|p| p.serves(&wanted)).collect()
    }

    /// Every label the registry can answer to
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .patterns
            .iter()
            .flat_map(|p| p.aliases.iter().map(String::as_str))
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_patterns() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(!registry.all_patterns().is_empty());
    }

    #[test]
    fn test_email_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let email_patterns = registry.patterns_for_label("email");
        assert!(!email_patterns.is_empty());

        let pattern = email_patterns[0];
        assert!(pattern.regex.is_match("test@example.com"));
        assert!(!pattern.regex.is_match("not-an-email"));
    }

    #[test]
    fn test_alias_lookup_is_case_insensitive() {
        let registry = PatternRegistry::default_patterns().unwrap();
        assert!(!registry.patterns_for_label("Email Address").is_empty());
    }

    #[test]
    fn test_phone_pattern() {
        let registry = PatternRegistry::default_patterns().unwrap();
        let phone_patterns = registry.patterns_for_label("phone number");
        assert!(!phone_patterns.is_empty());

        let text = "Call me at (555) 123-4567";
        assert!(phone_patterns.iter().any(|p| p.regex.is_match(text)));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let toml = r#"
            [patterns.broken]
            labels = ["x"]
            confidence = 0.5
            patterns = ['(unclosed']
        "#;
        let err = PatternRegistry::from_toml(toml).unwrap_err();
        assert!(matches!(err, DetectorError::InvalidPattern(_)));
    }

    #[test]
    fn test_missing_labels_rejected() {
        let toml = r#"
            [patterns.nolabel]
            labels = []
            confidence = 0.5
            patterns = ['x']
        "#;
        assert!(PatternRegistry::from_toml(toml).is_err());
    }

    #[test]
    fn test_confidence_out_of_range_rejected() {
        let toml = r#"
            [patterns.loud]
            labels = ["x"]
            confidence = 1.5
            patterns = ['x']
        "#;
        assert!(PatternRegistry::from_toml(toml).is_err());
    }

    #[test]
    fn test_groups_in_name_order() {
        let toml = r#"
            [patterns.zeta]
            labels = ["z"]
            confidence = 0.5
            patterns = ['z']

            [patterns.alpha]
            labels = ["a"]
            confidence = 0.5
            patterns = ['a']
        "#;
        let registry = PatternRegistry::from_toml(toml).unwrap();
        let labels: Vec<&str> = registry
            .all_patterns()
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(labels, vec!["a", "z"]);
    }
}
