//! # Error Hierarchy
//!
//! Structured error types shared across the workspace, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.

use thiserror::Error;

/// Errors during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed during canonicalization.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Caller input that fails business validation.
///
/// Each variant names the offending field so the API layer can report it
/// back to the caller verbatim (these are always caller-safe messages).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or blank.
    #[error("{field} must not be blank")]
    Blank {
        /// Wire name of the field.
        field: &'static str,
    },

    /// A field's length fell outside the permitted range (in characters).
    #[error("{field} length must be between {min} and {max} characters, got {actual}")]
    Length {
        /// Wire name of the field.
        field: &'static str,
        /// Minimum permitted length.
        min: usize,
        /// Maximum permitted length.
        max: usize,
        /// Observed length.
        actual: usize,
    },
}
