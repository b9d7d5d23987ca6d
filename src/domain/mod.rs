//! Domain models and types for Veil.
//!
//! The domain layer provides:
//! - **Entity model** ([`Entity`]) shared by detection and substitution
//! - **Error types** ([`VeilError`], [`DetectorError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible engine operations return [`Result<T, VeilError>`]:
//!
//! ```rust
//! use veil::domain::{Entity, Result};
//!
//! fn example() -> Result<String> {
//!     let entities = vec![Entity::new(1, "Jane Doe", "person")];
//!     veil::anonymization::substitution::anonymize("Jane Doe called.", &entities)
//! }
//! ```

pub mod entity;
pub mod errors;
pub mod result;

pub use entity::Entity;
pub use errors::{DetectorError, VeilError};
pub use result::Result;
