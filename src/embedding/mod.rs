//! Embedding providers.
//!
//! The cache only depends on [`EmbeddingProvider`]; the model itself lives
//! outside this crate.
//!
//! - [`StubEmbedder`] is deterministic and offline (tests, local runs).
//! - [`HttpEmbedder`] calls an OpenAI-compatible embeddings endpoint.

mod error;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod stub;


pub use error::EmbeddingError;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use stub::StubEmbedder;

use crate::constants::validate_embedding_dim;

/// Turns text into a fixed-length vector.
pub trait EmbeddingProvider: Send + Sync {
    /// Output dimensionality (constant across calls).
    fn dimensions(&self) -> usize;

    /// Embeds `text`.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}

/// Rejects empty vectors, non-finite values and unexpected lengths.
pub fn validate_embedding(embedding: &[f32], expected_dim: usize) -> Result<(), EmbeddingError> {
    validate_embedding_dim(embedding.len(), expected_dim).map_err(|e| {
        EmbeddingError::InvalidEmbedding {
            reason: e.to_string(),
        }
    })?;
    if let Some(pos) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(EmbeddingError::InvalidEmbedding {
            reason: format!("non-finite value at index {}", pos),
        });
    }
    Ok(())
}
