//! Audit logging module
//!
//! Appends one record per redacted document. Entity names are stored only as
//! SHA-256 hashes.

pub mod logger;

pub use logger::{hash_pii_value, AuditLogger};
