use crate::embedding::EmbeddingError;
use crate::vectordb::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the semantic cache.
pub enum SemanticCacheError {
    /// Embedding generation failed or produced an unusable vector.
    #[error("embedding generation failed: {reason}")]
    EmbeddingFailed {
        /// Error message.
        reason: String,
    },

    /// Vector store error (unavailable backend, invalid record).
    #[error("vector store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration (threshold, dimension disagreement).
    #[error("configuration error: {reason}")]
    Config {
        /// Error message.
        reason: String,
    },
}

impl From<EmbeddingError> for SemanticCacheError {
    fn from(err: EmbeddingError) -> Self {
        SemanticCacheError::EmbeddingFailed {
            reason: err.to_string(),
        }
    }
}

impl SemanticCacheError {
    /// Returns `true` if the embedding step failed.
    pub fn is_embedding_failure(&self) -> bool {
        matches!(self, SemanticCacheError::EmbeddingFailed { .. })
    }

    /// Returns `true` if the backing store could not be reached.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, SemanticCacheError::Store(e) if e.is_unavailable())
    }
}

/// Convenience result type for semantic cache operations.
pub type SemanticCacheResult<T> = Result<T, SemanticCacheError>;
