use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by vector store operations.
pub enum StoreError {
    /// The backing medium could not be reached (or failed mid-operation).
    #[error("record store '{backend}' unavailable: {message}")]
    Unavailable {
        /// Backend name (`memory`, `file`, ...).
        backend: &'static str,
        /// Error message.
        message: String,
    },

    /// Record data is malformed (empty embedding, non-finite values, bad id, ...).
    #[error("invalid record '{id}': {reason}")]
    InvalidRecord {
        /// Record id.
        id: String,
        /// Error message.
        reason: String,
    },

    /// Record embedding length differs from the store's dimensionality.
    #[error("invalid vector dimension for record '{id}': expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Record id.
        id: String,
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}

impl StoreError {
    pub(crate) fn unavailable(backend: &'static str, message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            backend,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(id: &str, reason: impl Into<String>) -> Self {
        StoreError::InvalidRecord {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`StoreError::Unavailable`].
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }

    /// Returns `true` for record-level validation failures.
    pub fn is_invalid_record(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidRecord { .. } | StoreError::DimensionMismatch { .. }
        )
    }
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
