//! Error types for qast.

use thiserror::Error;

/// The main error type for qast operations.
///
/// Compilation itself is total for well-formed input; the variants here come
/// from the filter guards, strict mode, and the I/O edges (JSON, config).
#[derive(Debug, Error)]
pub enum QastError {
    /// The filter tree nests deeper than the configured limit.
    #[error("Filter nesting exceeds the maximum depth of {limit}")]
    FilterTooDeep { limit: usize },

    /// The filter tree holds more nodes than the configured limit.
    #[error("Filter exceeds the maximum of {limit} nodes")]
    FilterTooLarge { limit: usize },

    /// A field reference failed strict validation.
    #[error("Invalid field reference '{reference}' in {location}: {message}")]
    InvalidFieldRef {
        reference: String,
        location: String,
        message: String,
    },

    /// Failed to decode a query description.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QastError {
    /// Create an invalid field reference error.
    pub fn invalid_field(
        reference: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidFieldRef {
            reference: reference.into(),
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for qast operations.
pub type QastResult<T> = Result<T, QastError>;
