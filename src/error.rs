//! Error types for MODS mapping operations.
//!
//! This module provides the [`ModsError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all MODS mapping operations.
///
/// A matched element that carries no text is never an error; the mapper
/// treats it as absent and leaves the field out of the output.
#[derive(Error, Debug)]
pub enum ModsError {
    /// A nested element or attribute the mapping relies on is missing.
    #[error("Malformed MODS record: {0}")]
    MalformedRecord(String),

    /// The input is not well-formed XML.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// IO error from the underlying source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serializing a record dictionary to JSON failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`ModsError`].
pub type Result<T> = std::result::Result<T, ModsError>;

impl ModsError {
    /// Shorthand for a [`ModsError::MalformedRecord`] naming the missing path.
    pub(crate) fn missing(path: &str, context: &str) -> Self {
        ModsError::MalformedRecord(format!("missing {path} in {context}"))
    }
}
