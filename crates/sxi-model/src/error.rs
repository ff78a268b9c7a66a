//! Error types for the instance list model
//!
//! Covers the three failure families of the model layer:
//! - Construction of records from wrongly typed document nodes
//! - URL uniqueness and format violations on insertion
//! - Documents that cannot be decoded at all

use crate::codec::RecordKind;
use std::path::PathBuf;

/// Errors raised by the store, the codec and list file storage
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A record field does not have the expected document type
    #[error("{record}: {field} is not {expected}")]
    TypeMismatch {
        record: RecordKind,
        field: String,
        expected: &'static str,
    },

    /// URL uniqueness or format violation
    #[error("{0}")]
    Validation(String),

    /// Document is not a recognized shape
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Encoding the list failed
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// IO error on the list file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ModelError {
    /// Create type mismatch error for a record field
    pub fn type_mismatch(
        record: RecordKind,
        field: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            record,
            field: field.into(),
            expected,
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create malformed document error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether a human can fix the error by editing the document
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::TypeMismatch { .. } | Self::Validation(_) | Self::MalformedDocument(_)
        )
    }
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
