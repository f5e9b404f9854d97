//! Error types for the schema model.

use thiserror::Error;

use crate::validation::SchemaError;

/// Errors that can occur while loading or validating a schema.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
