//! Semantic response cache for LLM inference.
//!
//! A prompt is embedded, compared by cosine similarity against previously
//! stored prompts, and the stored response is returned when the best match
//! reaches the configured threshold. On a miss the caller runs inference and
//! stores the result, reusing the embedding from the lookup.
//!
//! ## Core Types
//! - [`SemanticCache`], [`SemanticCacheHandle`] - Lookup/store protocol
//! - [`CacheConfig`], [`Config`] - Threshold and environment configuration
//! - [`LookupResult`], [`EmbeddingToken`], [`OutcomeCounters`] - Lookup results and accounting
//!
//! ## Embedding
//! - [`EmbeddingProvider`] - The only seam to the embedding model
//! - [`StubEmbedder`], [`HttpEmbedder`] - Offline and OpenAI-compatible providers
//!
//! ## Vector Store
//! - [`VectorIndex`], [`VectorStore`] - Brute-force similarity search
//! - [`RecordBackend`], [`MemoryBackend`], [`FileBackend`] - Record persistence
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod telemetry;
pub mod vectordb;

pub use cache::{
    CacheConfig, CacheHit, CacheMiss, CacheOutcome, CacheStats, EmbeddingToken, LookupResult,
    OutcomeCounters, OutcomeRecorder, OutcomeSnapshot, SemanticCache, SemanticCacheError,
    SemanticCacheHandle, SemanticCacheResult,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::MockSemanticCache;

pub use config::{Config, ConfigError, ConfiguredBackend, ConfiguredCache, ConfiguredEmbedder};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    EmbeddingError, EmbeddingProvider, HttpEmbedder, HttpEmbedderConfig, StubEmbedder,
    validate_embedding,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use hashing::{RecordIdGenerator, hash_to_u64, prompt_fingerprint};
pub use telemetry::init_tracing;
pub use vectordb::{
    CacheRecord, FileBackend, MemoryBackend, RecordBackend, ScannedRecord, SimilarityMatch,
    StoreError, StoreResult, VectorIndex, VectorStore, cosine_similarity,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockRecordBackend;
