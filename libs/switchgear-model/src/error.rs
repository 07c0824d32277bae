//! Catalog Error Types

use thiserror::Error;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    /// A record violates an entity invariant
    #[error("Invalid catalog entry {key}: {reason}")]
    InvalidEntry { key: String, reason: String },

    /// Two records share a unique key
    #[error("Duplicate catalog key: {0}")]
    DuplicateKey(String),

    /// Catalog data could not be parsed
    #[error("Catalog parsing error: {0}")]
    Parsing(String),

    /// Backing store could not be read
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parsing(err.to_string())
    }
}

impl CatalogError {
    pub fn invalid_entry(key: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::InvalidEntry {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        CatalogError::Unavailable(msg.into())
    }
}
