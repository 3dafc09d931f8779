//! Builds a ready-to-use cache from a [`Config`].

use tracing::{info, warn};

use crate::cache::{SemanticCache, SemanticCacheError, SemanticCacheResult};
use crate::embedding::{EmbeddingError, EmbeddingProvider, HttpEmbedder, StubEmbedder};
use crate::vectordb::{
    CacheRecord, FileBackend, MemoryBackend, RecordBackend, ScannedRecord, StoreResult,
    VectorStore,
};

use super::Config;

/// Embedder selected by `SEMCACHE_EMBEDDING_URL`.
#[derive(Debug, Clone)]
pub enum ConfiguredEmbedder {
    Stub(StubEmbedder),
    Http(HttpEmbedder),
}

impl EmbeddingProvider for ConfiguredEmbedder {
    fn dimensions(&self) -> usize {
        match self {
            ConfiguredEmbedder::Stub(e) => e.dimensions(),
            ConfiguredEmbedder::Http(e) => e.dimensions(),
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self {
            ConfiguredEmbedder::Stub(e) => e.embed(text).await,
            ConfiguredEmbedder::Http(e) => e.embed(text).await,
        }
    }
}

/// Record backend selected by `SEMCACHE_STORAGE_PATH`.
#[derive(Debug, Clone)]
pub enum ConfiguredBackend {
    Memory(MemoryBackend),
    File(FileBackend),
}

impl RecordBackend for ConfiguredBackend {
    fn name(&self) -> &'static str {
        match self {
            ConfiguredBackend::Memory(b) => b.name(),
            ConfiguredBackend::File(b) => b.name(),
        }
    }

    async fn is_ready(&self) -> bool {
        match self {
            ConfiguredBackend::Memory(b) => b.is_ready().await,
            ConfiguredBackend::File(b) => b.is_ready().await,
        }
    }

    async fn put(&self, record: CacheRecord) -> StoreResult<()> {
        match self {
            ConfiguredBackend::Memory(b) => b.put(record).await,
            ConfiguredBackend::File(b) => b.put(record).await,
        }
    }

    async fn get(&self, id: &str) -> StoreResult<Option<CacheRecord>> {
        match self {
            ConfiguredBackend::Memory(b) => b.get(id).await,
            ConfiguredBackend::File(b) => b.get(id).await,
        }
    }

    async fn scan(&self) -> StoreResult<Vec<ScannedRecord>> {
        match self {
            ConfiguredBackend::Memory(b) => b.scan().await,
            ConfiguredBackend::File(b) => b.scan().await,
        }
    }

    async fn count(&self) -> StoreResult<usize> {
        match self {
            ConfiguredBackend::Memory(b) => b.count().await,
            ConfiguredBackend::File(b) => b.count().await,
        }
    }
}

/// Cache assembled by [`Config::build_cache`].
pub type ConfiguredCache = SemanticCache<ConfiguredEmbedder, VectorStore<ConfiguredBackend>>;

impl Config {
    /// Validates the config and wires the embedder, backend and cache together.
    ///
    /// No embedding URL selects the stub embedder; no storage path keeps
    /// records in memory. A configured storage directory is created.
    pub fn build_cache(&self) -> SemanticCacheResult<ConfiguredCache> {
        self.validate().map_err(|e| SemanticCacheError::Config {
            reason: e.to_string(),
        })?;

        let embedder = match self.http_embedder_config() {
            Some(http_config) => {
                let embedder =
                    HttpEmbedder::new(http_config).map_err(|e| SemanticCacheError::Config {
                        reason: e.to_string(),
                    })?;
                ConfiguredEmbedder::Http(embedder)
            }
            None => {
                warn!("No SEMCACHE_EMBEDDING_URL configured, running embedder in stub mode");
                ConfiguredEmbedder::Stub(StubEmbedder::new(self.embedding_dim))
            }
        };

        let backend = match &self.storage_path {
            Some(path) => ConfiguredBackend::File(FileBackend::open(path.clone())?),
            None => ConfiguredBackend::Memory(MemoryBackend::new()),
        };

        let store = VectorStore::new(backend).with_dimensions(self.embedding_dim);
        let cache = SemanticCache::new(embedder, store, self.cache_config())?;

        info!(
            backend = cache.index().backend().name(),
            embedding_dim = self.embedding_dim,
            threshold = self.similarity_threshold,
            "Semantic cache configured"
        );
        Ok(cache)
    }
}
