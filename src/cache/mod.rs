//! Semantic cache: lookup by meaning, store on miss.

pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod outcome;
pub mod semantic;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::CacheConfig;
pub use error::{SemanticCacheError, SemanticCacheResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSemanticCache;
pub use outcome::{OutcomeCounters, OutcomeRecorder, OutcomeSnapshot};
pub use semantic::{SemanticCache, SemanticCacheHandle};
pub use types::{CacheHit, CacheMiss, CacheOutcome, CacheStats, EmbeddingToken, LookupResult};
