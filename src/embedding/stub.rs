//! Deterministic stub embedder (no model or network required).

use tracing::debug;

use crate::constants::DEFAULT_EMBEDDING_DIM;
use crate::hashing::hash_to_u64;

use super::EmbeddingProvider;
use super::error::EmbeddingError;

/// Produces pseudo-random unit vectors seeded by a BLAKE3 hash of the text.
///
/// Identical text always yields the identical vector; different text yields
/// nearly orthogonal vectors at realistic dimensions. Useful for wiring tests
/// and local runs, useless for real semantic matching.
#[derive(Debug, Clone, Copy)]
pub struct StubEmbedder {
    dimensions: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl StubEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Synchronous core of [`EmbeddingProvider::embed`].
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.dimensions == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub embedding dimension must be > 0".to_string(),
            });
        }

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut state = hash_to_u64(text.as_bytes());
        let mut embedding = Vec::with_capacity(self.dimensions);

        for _ in 0..self.dimensions {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        Ok(normalize(embedding))
    }
}

fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}

impl EmbeddingProvider for StubEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_sync(text)
    }
}
