//! Error types for tessera

use thiserror::Error;

/// Result type alias for tessera operations
pub type Result<T> = std::result::Result<T, TesseraError>;

/// Unified error type for all tessera operations
#[derive(Error, Debug, Clone)]
pub enum TesseraError {
    #[error("MongoDB error: {0}")]
    MongoDB(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // Mapper usage errors, raised before any I/O happens

    /// A relationship was declared on a record that is not bound to a collection
    #[error("Logic error: {0}")]
    Logic(String),

    /// A relationship target or key name cannot be used
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A document field was read that is not present
    #[error("Missing key: {0}")]
    MissingKey(String),
}

impl TesseraError {
    /// Returns true if this error comes from misuse of the mapper rather than the database
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            TesseraError::Logic(_) | TesseraError::InvalidArgument(_)
        )
    }

    /// Returns true if this error is a missing document field
    pub fn is_missing_key(&self) -> bool {
        matches!(self, TesseraError::MissingKey(_))
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for TesseraError {
    fn from(err: mongodb::error::Error) -> Self {
        TesseraError::MongoDB(err.to_string())
    }
}
