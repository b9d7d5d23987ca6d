//! Redaction result models

pub mod document;

pub use document::{RedactedDocument, RedactionStats};
