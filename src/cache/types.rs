use crate::hashing::prompt_fingerprint;

/// Outcome of a lookup, reported to whoever keeps hit/miss totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

impl CacheOutcome {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "HIT",
            CacheOutcome::Miss => "MISS",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheOutcome::Hit)
    }
}

impl std::fmt::Display for CacheOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Embedding computed during a missed lookup, handed back to `store` so the
/// prompt is not embedded twice.
///
/// A token created by [`SemanticCache::lookup`](super::SemanticCache::lookup) is
/// bound to that prompt's fingerprint; `store` ignores it for any other prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingToken {
    embedding: Vec<f32>,
    fingerprint: Option<u64>,
}

impl EmbeddingToken {
    pub fn for_prompt(prompt: &str, embedding: Vec<f32>) -> Self {
        Self {
            embedding,
            fingerprint: Some(prompt_fingerprint(prompt)),
        }
    }

    /// A token usable with any prompt.
    pub fn unbound(embedding: Vec<f32>) -> Self {
        Self {
            embedding,
            fingerprint: None,
        }
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn into_embedding(self) -> Vec<f32> {
        self.embedding
    }

    pub fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }

    pub fn matches_prompt(&self, prompt: &str) -> bool {
        self.fingerprint
            .is_none_or(|fp| fp == prompt_fingerprint(prompt))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit {
    pub response: String,
    pub similarity: f32,
    pub record_id: String,
    pub model_tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheMiss {
    pub token: EmbeddingToken,
}

impl CacheMiss {
    pub fn into_token(self) -> EmbeddingToken {
        self.token
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Hit(CacheHit),
    Miss(CacheMiss),
}

impl LookupResult {
    pub fn outcome(&self) -> CacheOutcome {
        match self {
            LookupResult::Hit(_) => CacheOutcome::Hit,
            LookupResult::Miss(_) => CacheOutcome::Miss,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, LookupResult::Hit(_))
    }

    pub fn hit(&self) -> Option<&CacheHit> {
        match self {
            LookupResult::Hit(hit) => Some(hit),
            LookupResult::Miss(_) => None,
        }
    }

    /// The embedding token of a miss, `None` for a hit.
    pub fn into_token(self) -> Option<EmbeddingToken> {
        match self {
            LookupResult::Hit(_) => None,
            LookupResult::Miss(miss) => Some(miss.into_token()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Number of stored records.
    pub size: usize,
}
