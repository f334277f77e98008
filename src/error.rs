//! Error types for the compatibility checker

use std::path::PathBuf;
use thiserror::Error;

/// Result type for compatibility operations
pub type Result<T> = std::result::Result<T, CompatError>;

/// Compatibility checker errors
#[derive(Error, Debug)]
pub enum CompatError {
    #[error("Schema file not found: {}", path.display())]
    SchemaNotFound { path: PathBuf },

    #[error("Schema file is empty: {}", path.display())]
    EmptySchema { path: PathBuf },

    #[error("Invalid schema document: {0}")]
    InvalidSchema(String),

    #[error("Duplicate field '{field}' in record '{record}'")]
    DuplicateField { record: String, field: String },

    #[error("Duplicate definition of named type '{0}'")]
    DuplicateNamedType(String),

    #[error("Registry returned no compatibility level")]
    MissingCompatibilityLevel,

    #[error("Registry request failed: {0}")]
    Registry(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
