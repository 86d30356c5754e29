//! Error types for manifest loading.

use thiserror::Error;

/// Error type for manifest parsing and validation.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}
