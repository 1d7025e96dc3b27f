//! # Core Data Models for Document Utilities
//!
//! This module defines the types shared by the expander, the change
//! extractor and the sorter.
//!
//! ## Documents
//!
//! Entity metadata travels between the console and the registry API as JSON.
//! A document is therefore represented directly as [`serde_json::Value`],
//! which is already a tagged variant over the three shapes the utilities
//! care about:
//!
//! | Shape | Variants |
//! |-------|----------|
//! | Primitive | `Null`, `Bool`, `Number`, `String` |
//! | Sequence | `Array` |
//! | Mapping | `Object` |
//!
//! An absent key plays the role of "undefined". The workspace enables the
//! `preserve_order` feature of `serde_json`, so mappings keep insertion order;
//! the expander relies on this when it walks flat form data.

use thiserror::Error;

/// A nested key-value document.
pub type Document = serde_json::Value;

/// A mapping from string key to [`Document`].
pub type Mapping = serde_json::Map<String, Document>;

/// SHA-256 output size in bytes.
pub const FINGERPRINT_SIZE: usize = 32;

/// SHA-256 digest of a document's canonical form.
///
/// See [`crate::canonicalize::fingerprint`].
pub type Fingerprint = [u8; FINGERPRINT_SIZE];

/// Returns a short name for the shape of a document, used in error messages.
pub fn shape_name(value: &Document) -> &'static str {
    match value {
        Document::Null => "null",
        Document::Bool(_) => "boolean",
        Document::Number(_) => "number",
        Document::String(_) => "string",
        Document::Array(_) => "sequence",
        Document::Object(_) => "mapping",
    }
}

/// Errors raised at the boundary where raw input becomes a [`Mapping`].
///
/// The algorithms themselves never fail; only parsing does.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Input was not valid JSON.
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// A mapping was required at the root but another shape was found.
    #[error("Expected a mapping at the document root, found {found}")]
    NotAMapping {
        /// Shape of the value that was found instead.
        found: &'static str,
    },
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Parses JSON text into a root mapping.
///
/// # Errors
///
/// Returns [`DocumentError::Json`] for malformed text and
/// [`DocumentError::NotAMapping`] when the root is not an object.
pub fn parse_mapping(text: &str) -> Result<Mapping> {
    let value: Document = serde_json::from_str(text)?;
    into_mapping(value)
}

/// Unwraps a root document into its mapping.
///
/// # Errors
///
/// Returns [`DocumentError::NotAMapping`] when the value is not an object.
pub fn into_mapping(value: Document) -> Result<Mapping> {
    match value {
        Document::Object(map) => Ok(map),
        other => Err(DocumentError::NotAMapping {
            found: shape_name(&other),
        }),
    }
}
