use std::cmp::Ordering;

use tracing::{debug, instrument, warn};

use super::backend::{RecordBackend, ScannedRecord};
use super::error::{StoreError, StoreResult};
use super::model::{CacheRecord, SimilarityMatch};
use super::similarity::cosine_similarity;

/// Similarity-search contract used by the semantic cache.
///
/// `search` returns matches with `score >= threshold`, sorted by descending
/// score with ties broken by ascending record id, truncated to `limit`.
/// [`VectorStore`] satisfies it with a linear scan; an indexed implementation
/// must keep the same ordering and threshold semantics.
pub trait VectorIndex: Send + Sync {
    /// Embedding length every record must have, if the index enforces one.
    fn dimensions(&self) -> Option<usize>;

    /// Returns `true` if the index is ready for requests.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Stores (or overwrites) a record.
    fn put(&self, record: CacheRecord) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Fetches a record by id.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<CacheRecord>>> + Send;

    /// Every decodable record, in unspecified order.
    fn all_records(&self) -> impl std::future::Future<Output = StoreResult<Vec<CacheRecord>>> + Send;

    /// Number of stored records.
    fn count(&self) -> impl std::future::Future<Output = StoreResult<usize>> + Send;

    /// Best matches for `query` at or above `threshold`.
    fn search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> impl std::future::Future<Output = StoreResult<Vec<SimilarityMatch>>> + Send;
}

/// Brute-force vector store over a [`RecordBackend`].
///
/// Search is O(n·d): every record is scored against the query. Fine for
/// hundreds to low thousands of records.
#[derive(Debug, Clone)]
pub struct VectorStore<B: RecordBackend> {
    backend: B,
    dimensions: Option<usize>,
}

impl<B: RecordBackend> VectorStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            dimensions: None,
        }
    }

    /// Rejects puts whose embedding length is not `dimensions`.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub async fn is_ready(&self) -> bool {
        self.backend.is_ready().await
    }

    /// Validates and writes `record`.
    pub async fn put(&self, record: CacheRecord) -> StoreResult<()> {
        record.validate()?;

        if let Some(expected) = self.dimensions
            && record.dimensions() != expected
        {
            return Err(StoreError::DimensionMismatch {
                id: record.id,
                expected,
                actual: record.embedding.len(),
            });
        }

        self.backend.put(record).await
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<CacheRecord>> {
        self.backend.get(id).await
    }

    /// Enumerates all records, skipping entries that fail to decode.
    pub async fn all_records(&self) -> StoreResult<Vec<CacheRecord>> {
        let scanned = self.backend.scan().await?;
        let mut records = Vec::with_capacity(scanned.len());

        for entry in scanned {
            match entry {
                ScannedRecord::Decoded(record) => records.push(record),
                ScannedRecord::Malformed { key, reason } => {
                    warn!(
                        backend = self.backend.name(),
                        key = %key,
                        reason = %reason,
                        "Skipping malformed record"
                    );
                }
            }
        }

        Ok(records)
    }

    pub async fn count(&self) -> StoreResult<usize> {
        self.backend.count().await
    }

    #[instrument(skip(self, query), fields(backend = self.backend.name(), query_dim = query.len()))]
    pub async fn search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> StoreResult<Vec<SimilarityMatch>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let records = self.all_records().await?;
        let scanned = records.len();

        let mut matches = rank_matches(query, records, threshold);
        matches.truncate(limit);

        debug!(
            scanned,
            returned = matches.len(),
            best_score = matches.first().map(|m| m.score),
            "Vector search complete"
        );

        Ok(matches)
    }
}

/// Scores, filters and orders `records` against `query`.
///
/// Records whose embedding length differs from the query never match.
pub fn rank_matches(query: &[f32], records: Vec<CacheRecord>, threshold: f32) -> Vec<SimilarityMatch> {
    let mut matches: Vec<SimilarityMatch> = records
        .into_iter()
        .filter(|record| record.embedding.len() == query.len())
        .filter_map(|record| {
            let score = cosine_similarity(query, &record.embedding);
            (score >= threshold).then(|| SimilarityMatch::new(record, score))
        })
        .collect();

    // NaN scores were dropped by the threshold filter.
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    matches
}

impl<B: RecordBackend> VectorIndex for VectorStore<B> {
    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    async fn is_ready(&self) -> bool {
        self.is_ready().await
    }

    async fn put(&self, record: CacheRecord) -> StoreResult<()> {
        self.put(record).await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<CacheRecord>> {
        self.get(id).await
    }

    async fn all_records(&self) -> StoreResult<Vec<CacheRecord>> {
        self.all_records().await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.count().await
    }

    async fn search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> StoreResult<Vec<SimilarityMatch>> {
        self.search(query, threshold, limit).await
    }
}
