use crate::constants::DEFAULT_SIMILARITY_THRESHOLD;

use super::error::{SemanticCacheError, SemanticCacheResult};

/// Per-instance cache settings, fixed for the cache's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheConfig {
    /// Minimum cosine similarity for a hit, in `[0, 1]`. Default: `0.85`.
    pub similarity_threshold: f32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl CacheConfig {
    pub fn with_threshold(similarity_threshold: f32) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn validate(&self) -> SemanticCacheResult<()> {
        let t = self.similarity_threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(SemanticCacheError::Config {
                reason: format!("similarity_threshold must be within [0, 1], got {}", t),
            });
        }
        Ok(())
    }
}
