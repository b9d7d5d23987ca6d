// Veil - PII Anonymization Engine
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - PII Anonymization Engine
//!
//! Veil turns free-form text into a redacted copy in which every detected
//! piece of personally identifiable information is replaced by a typed,
//! numbered placeholder such as `[1_person_a]` or `[2_email]`, plus a
//! manifest mapping each placeholder id back to the original text.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Segmenting** long documents into bounded slices for a detector
//! - **Detecting** PII spans through a pluggable detector (built-in patterns
//!   or a remote HTTP service)
//! - **Aggregating** spans across slices into deduplicated, densely numbered
//!   entities
//! - **Substituting** every occurrence of every entity word with its
//!   placeholder
//! - **Verifying** that redacted output is safe to hand to an outbound consumer
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Segmenter, detectors, aggregator, substitution engine
//! - [`domain`] - Entity model and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::anonymization::AnonymizationEngine;
//! use veil::config::load_config_or_default;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("veil.toml")?;
//!     let engine = AnonymizationEngine::from_config(&config.detection, &config.audit)?;
//!
//!     engine.initialize().await?;
//!     let document = engine
//!         .anonymize_document("memo", "Call Jane at jane@example.com", &config.detection.labels)
//!         .await?;
//!
//!     println!("{}", document.redacted_text);
//!     Ok(())
//! }
//! ```
//!
//! ## Substitution Only
//!
//! When the entities are already known, no detector is needed:
//!
//! ```rust
//! use veil::anonymization::anonymize;
//! use veil::domain::Entity;
//!
//! let entities = vec![
//!     Entity::new(1, "Jane Doe", "person"),
//!     Entity::new(2, "support@example.com", "email"),
//! ];
//! let redacted = anonymize("Jane Doe <support@example.com>. Thanks, Jane", &entities).unwrap();
//! assert_eq!(
//!     redacted,
//!     "[1_person_a] [1_person_b] <[2_email]>. Thanks, [1_person_a]"
//! );
//! ```
//!
//! ## Error Handling
//!
//! Veil uses the [`domain::VeilError`] type for all library errors. A failing
//! detector call aborts the whole document; no partially redacted text is
//! ever returned.
//!
//! ## Logging
//!
//! Veil uses structured logging with the `tracing` crate. Log records carry
//! entity ids, types, counts and lengths, never the entity text itself.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
