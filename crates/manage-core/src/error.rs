//! Error types for the metadata registry console core.

use manage_document::DocumentError;
use thiserror::Error;

/// Core error type for console operations.
#[derive(Debug, Error)]
pub enum ManageError {
    /// Document parsing failed.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML.
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration value is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity type string is not one of the registry collections.
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// A `patternProperties` key in a schema is not a valid regex.
    #[error("Invalid schema pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The entity document lacks a required part.
    #[error("Malformed entity: {0}")]
    MalformedEntity(String),

    /// The edit does not change the entity.
    #[error("No data is changed for {meta_data_id}")]
    NoChanges {
        /// Identifier of the entity that was edited.
        meta_data_id: String,
    },
}
