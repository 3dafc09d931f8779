use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::constants::LOOKUP_MATCH_LIMIT;
use crate::embedding::{EmbeddingProvider, validate_embedding};
use crate::hashing::{RecordIdGenerator, prompt_fingerprint};
use crate::vectordb::{CacheRecord, VectorIndex};

use super::config::CacheConfig;
use super::error::{SemanticCacheError, SemanticCacheResult};
use super::types::{CacheHit, CacheMiss, CacheStats, EmbeddingToken, LookupResult};

/// Embedding-based cache in front of an inference call.
///
/// Holds no per-request state: one instance can serve concurrent requests
/// (wrap it in [`SemanticCacheHandle`] to share). A `lookup` followed by a
/// `store` is not transactional, so two racing misses for the same meaning can
/// both store a record.
pub struct SemanticCache<E: EmbeddingProvider, I: VectorIndex> {
    embedder: E,
    index: I,
    config: CacheConfig,
    ids: RecordIdGenerator,
}

impl<E: EmbeddingProvider, I: VectorIndex> std::fmt::Debug for SemanticCache<E, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticCache")
            .field("config", &self.config)
            .field("embedding_dim", &self.embedder.dimensions())
            .field("index_dim", &self.index.dimensions())
            .finish_non_exhaustive()
    }
}

impl<E: EmbeddingProvider, I: VectorIndex> SemanticCache<E, I> {
    /// Builds a cache, rejecting invalid thresholds and dimension disagreement
    /// between `embedder` and `index`.
    pub fn new(embedder: E, index: I, config: CacheConfig) -> SemanticCacheResult<Self> {
        config.validate()?;

        let embedding_dim = embedder.dimensions();
        if embedding_dim == 0 {
            return Err(SemanticCacheError::Config {
                reason: "embedding provider reports 0 dimensions".to_string(),
            });
        }
        if let Some(index_dim) = index.dimensions()
            && index_dim != embedding_dim
        {
            return Err(SemanticCacheError::Config {
                reason: format!(
                    "vector index expects {} dimensions but the embedding provider produces {}",
                    index_dim, embedding_dim
                ),
            });
        }

        Ok(Self {
            embedder,
            index,
            config,
            ids: RecordIdGenerator::new(),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.config.similarity_threshold
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub async fn is_ready(&self) -> bool {
        self.index.is_ready().await
    }

    async fn embed_prompt(&self, prompt: &str) -> SemanticCacheResult<Vec<f32>> {
        let embedding = self.embedder.embed(prompt).await?;
        validate_embedding(&embedding, self.embedder.dimensions())?;
        Ok(embedding)
    }

    /// Looks up a prompt by meaning.
    ///
    /// Returns a hit with the best match at or above the threshold, or a miss
    /// carrying the computed embedding for a later [`store`](Self::store).
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn lookup(&self, prompt: &str) -> SemanticCacheResult<LookupResult> {
        debug!("Generating embedding for prompt");
        let embedding = self.embed_prompt(prompt).await?;

        let token = EmbeddingToken::for_prompt(prompt, embedding);
        self.decide(token).await
    }

    /// Looks up a caller-supplied query embedding.
    #[instrument(skip(self, embedding), fields(embedding_dim = embedding.len()))]
    pub async fn lookup_embedding(&self, embedding: Vec<f32>) -> SemanticCacheResult<LookupResult> {
        validate_embedding(&embedding, self.embedder.dimensions())?;
        self.decide(EmbeddingToken::unbound(embedding)).await
    }

    async fn decide(&self, token: EmbeddingToken) -> SemanticCacheResult<LookupResult> {
        let threshold = self.config.similarity_threshold;
        let matches = self
            .index
            .search(token.embedding(), threshold, LOOKUP_MATCH_LIMIT)
            .await?;

        match matches.into_iter().find(|m| m.score >= threshold) {
            Some(best) => {
                info!(
                    similarity = best.score,
                    record_id = %best.record.id,
                    model_tag = %best.record.model_tag,
                    "Semantic cache hit"
                );
                Ok(LookupResult::Hit(CacheHit {
                    response: best.record.response,
                    similarity: best.score,
                    record_id: best.record.id,
                    model_tag: best.record.model_tag,
                }))
            }
            None => {
                debug!(threshold, "Semantic cache miss");
                Ok(LookupResult::Miss(CacheMiss { token }))
            }
        }
    }

    /// Stores a freshly computed response and returns the new record id.
    ///
    /// `token` (from a missed [`lookup`](Self::lookup) of the same prompt) is
    /// reused instead of embedding again; a token bound to a different prompt
    /// is discarded. A reused embedding must match the provider's dimension.
    #[instrument(
        skip(self, prompt, response, model_tag, token),
        fields(prompt_len = prompt.len(), response_len = response.len(), model_tag = model_tag)
    )]
    pub async fn store(
        &self,
        prompt: &str,
        response: &str,
        model_tag: &str,
        token: Option<EmbeddingToken>,
    ) -> SemanticCacheResult<String> {
        let embedding = match token {
            Some(token) if token.matches_prompt(prompt) => {
                debug!("Reusing embedding from lookup");
                let embedding = token.into_embedding();
                validate_embedding(&embedding, self.embedder.dimensions())?;
                embedding
            }
            Some(token) => {
                warn!(
                    token_fingerprint = ?token.fingerprint(),
                    prompt_fingerprint = prompt_fingerprint(prompt),
                    "Embedding token was computed for a different prompt, re-embedding"
                );
                self.embed_prompt(prompt).await?
            }
            None => self.embed_prompt(prompt).await?,
        };

        let created_at = Utc::now().timestamp_millis();
        let id = self.ids.next_id(prompt, created_at);

        let record = CacheRecord {
            id: id.clone(),
            prompt: prompt.to_string(),
            embedding,
            response: response.to_string(),
            created_at,
            model_tag: model_tag.to_string(),
        };

        self.index.put(record).await?;

        info!(record_id = %id, "Response stored in semantic cache");
        Ok(id)
    }

    pub async fn stats(&self) -> SemanticCacheResult<CacheStats> {
        let size = self.index.count().await?;
        Ok(CacheStats { size })
    }

    /// Scans the corpus and fails if any record's dimension disagrees with the
    /// embedding provider. Returns the number of records checked.
    pub async fn verify_store(&self) -> SemanticCacheResult<usize> {
        let expected = self.embedder.dimensions();
        let records = self.index.all_records().await?;

        if let Some(bad) = records.iter().find(|r| r.dimensions() != expected) {
            return Err(SemanticCacheError::Config {
                reason: format!(
                    "record '{}' has {} dimensions but the embedding provider produces {}",
                    bad.id,
                    bad.dimensions(),
                    expected
                ),
            });
        }

        debug!(records = records.len(), "Store dimensions verified");
        Ok(records.len())
    }
}

/// Cheaply cloneable shared reference to a [`SemanticCache`].
pub struct SemanticCacheHandle<E: EmbeddingProvider, I: VectorIndex> {
    inner: Arc<SemanticCache<E, I>>,
}

impl<E: EmbeddingProvider, I: VectorIndex> Clone for SemanticCacheHandle<E, I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: EmbeddingProvider, I: VectorIndex> SemanticCacheHandle<E, I> {
    pub fn new(cache: SemanticCache<E, I>) -> Self {
        Self {
            inner: Arc::new(cache),
        }
    }

    pub fn cache(&self) -> &SemanticCache<E, I> {
        &self.inner
    }

    pub async fn lookup(&self, prompt: &str) -> SemanticCacheResult<LookupResult> {
        self.inner.lookup(prompt).await
    }

    pub async fn store(
        &self,
        prompt: &str,
        response: &str,
        model_tag: &str,
        token: Option<EmbeddingToken>,
    ) -> SemanticCacheResult<String> {
        self.inner.store(prompt, response, model_tag, token).await
    }

    pub async fn stats(&self) -> SemanticCacheResult<CacheStats> {
        self.inner.stats().await
    }

    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<E: EmbeddingProvider, I: VectorIndex> std::fmt::Debug for SemanticCacheHandle<E, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticCacheHandle")
            .field("strong_count", &self.strong_count())
            .finish()
    }
}
