//! Record and match types.

use chrono::{DateTime, Utc};

use super::error::{StoreError, StoreResult};

/// A cached prompt/response pair.
///
/// Created once on a cache miss and immutable afterwards. Stored as `rkyv` bytes
/// by the file backend.
///
/// # Example
/// ```rust
/// use semcache::CacheRecord;
///
/// let record = CacheRecord::new("a", "What is the capital of France?", vec![1.0, 0.0, 0.0], "Paris", "gpt-4o");
/// assert_eq!(record.dimensions(), 3);
/// assert!(record.validate().is_ok());
/// ```
#[derive(
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
    serde::Serialize,
    serde::Deserialize,
    Debug,
    Clone,
    PartialEq,
)]
pub struct CacheRecord {
    /// Unique record id (stable for the record's lifetime).
    pub id: String,
    /// Original prompt text (kept for debugging, not used for matching).
    pub prompt: String,
    /// Prompt embedding.
    pub embedding: Vec<f32>,
    /// Response returned on a hit.
    pub response: String,
    /// Creation time in Unix milliseconds.
    pub created_at: i64,
    /// Label of the backend that produced `response` (informational only).
    pub model_tag: String,
}

impl CacheRecord {
    /// Builds a record stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        embedding: Vec<f32>,
        response: impl Into<String>,
        model_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            embedding,
            response: response.into(),
            created_at: Utc::now().timestamp_millis(),
            model_tag: model_tag.into(),
        }
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    /// Checks write-time invariants: non-empty id, non-empty finite embedding.
    pub fn validate(&self) -> StoreResult<()> {
        if self.id.is_empty() {
            return Err(StoreError::invalid(&self.id, "id is empty"));
        }
        if self.embedding.is_empty() {
            return Err(StoreError::invalid(&self.id, "embedding is empty"));
        }
        if let Some(pos) = self.embedding.iter().position(|v| !v.is_finite()) {
            return Err(StoreError::invalid(
                &self.id,
                format!("embedding has a non-finite value at index {}", pos),
            ));
        }
        Ok(())
    }
}

/// A search hit: a stored record and its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub record: CacheRecord,
    pub score: f32,
}

impl SimilarityMatch {
    pub fn new(record: CacheRecord, score: f32) -> Self {
        Self { record, score }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }
}
