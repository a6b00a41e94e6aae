//! Error types for the catalog crate.
//!
//! Only loading and validating a catalog snapshot can fail; lookups
//! return `Option` and the prediction engine never sees these errors.

use thiserror::Error;

use crate::types::ItemId;

/// Errors that can occur while loading or validating catalog data
#[derive(Error, Debug)]
pub enum CatalogError {
    /// I/O error occurred while reading a snapshot file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Snapshot file is not valid JSON or does not match the schema
    #[error("Malformed snapshot: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Referenced entity doesn't exist (e.g., rating for an unknown item)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: ItemId },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
