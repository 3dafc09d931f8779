//! Mock semantic cache helpers (mock embedder + mock record backend).

use crate::embedding::MockEmbedder;
use crate::vectordb::{MockRecordBackend, VectorStore};

use super::config::CacheConfig;
use super::error::SemanticCacheResult;
use super::semantic::SemanticCache;

/// Type alias for a semantic cache backed by mocks.
pub type MockSemanticCache = SemanticCache<MockEmbedder, VectorStore<MockRecordBackend>>;

impl SemanticCache<MockEmbedder, VectorStore<MockRecordBackend>> {
    /// Creates a mock cache whose store enforces `dimensions`.
    pub fn new_mock(dimensions: usize, config: CacheConfig) -> SemanticCacheResult<Self> {
        let embedder = MockEmbedder::new(dimensions);
        let store = VectorStore::new(MockRecordBackend::new()).with_dimensions(dimensions);
        Self::new(embedder, store, config)
    }
}
