//! Anonymization module for Veil
//!
//! This module turns free-form text into redacted text plus an entity
//! manifest.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Segmentation**: bounded, lazy slicing of the input ([`segmenter`])
//! - **Detection**: a pluggable span detector called once per slice ([`detector`])
//! - **Aggregation**: cross-slice deduplication and dense numbering ([`aggregator`])
//! - **Substitution**: typed placeholder replacement ([`substitution`]) over
//!   token-bounded literal matches ([`matcher`])
//! - **Safety**: export gate on the redacted output ([`safety`])
//! - **Audit**: append-only log with hashed entity names ([`audit`])
//!
//! # Usage
//!
//! ```rust
//! use veil::anonymization::substitution::anonymize;
//! use veil::domain::Entity;
//!
//! let entities = vec![Entity::new(1, "Jane Doe", "person")];
//! let redacted = anonymize("Jane Doe called. Doe left.", &entities).unwrap();
//! assert_eq!(redacted, "[1_person_a] [1_person_b] called. [1_person_b] left.");
//! ```

pub mod aggregator;
pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod labels;
pub mod matcher;
pub mod models;
pub mod placeholder;
pub mod report;
pub mod safety;
pub mod segmenter;
pub mod substitution;

// Re-export main types
pub use config::{AuditConfig, DetectionConfig, DetectorBackend};
pub use engine::{AnonymizationEngine, EngineSettings, EngineState};
pub use models::{RedactedDocument, RedactionStats};
pub use report::RedactionReport;
pub use safety::{verify_redaction, RedactionCheck};
pub use substitution::anonymize;
