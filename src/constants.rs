//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! Every record in a store must carry an embedding of the same length as the
//! embedding provider's output. [`DEFAULT_EMBEDDING_DIM`] is only a default for
//! configuration; the authoritative value comes from
//! [`EmbeddingProvider::dimensions`](crate::embedding::EmbeddingProvider::dimensions).
//! Use [`validate_embedding_dim`] at module boundaries to catch mismatches early.

/// Minimum cosine similarity for a stored record to count as a hit.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.85;

/// Output dimension of the default embedding model (`text-embedding-3-small`).
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Default embedding model requested from an OpenAI-compatible endpoint.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Number of matches the cache asks for when deciding hit vs. miss.
pub const LOOKUP_MATCH_LIMIT: usize = 1;

/// File extension used by the file-per-record backend.
pub const RECORD_FILE_EXTENSION: &str = "rkyv";

/// Extension of in-flight record writes (renamed on completion).
pub const RECORD_TEMP_EXTENSION: &str = "rkyv.tmp";

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use semcache::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// let embedder_dim = 1536;
/// validate_embedding_dim(embedder_dim, DEFAULT_EMBEDDING_DIM).unwrap();
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 || actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
