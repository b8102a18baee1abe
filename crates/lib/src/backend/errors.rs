//! Error types for nested-set store backends.
//!
//! Backend errors are propagated unmodified by every structural operation.
//! A failed bulk update is never retried, since re-running a partially
//! applied shift would apply its delta twice.

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Field additions/changes require a major version bump
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Record not found by ID.
    #[error("Record not found: {id}")]
    RecordNotFound {
        /// The ID of the record that was not found
        id: i64,
    },

    /// A store operation failed in a custom backend.
    #[error("Store operation {operation} failed: {reason}")]
    OperationFailed {
        /// The operation that failed (scan, update, delete, ...)
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Persisted file uses a format version this build cannot read.
    #[error("Unsupported persistence version {found}; only version {supported} is supported")]
    UnsupportedVersion {
        /// Version found in the file
        found: u8,
        /// Version this build writes
        supported: u8,
    },
}

impl BackendError {
    /// Check if this error indicates a record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::RecordNotFound { .. })
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
                | BackendError::UnsupportedVersion { .. }
        )
    }

    /// Get the record ID if this error is about a specific record.
    pub fn record_id(&self) -> Option<i64> {
        match self {
            BackendError::RecordNotFound { id } => Some(*id),
            _ => None,
        }
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
