use super::error::StoreResult;
use super::model::CacheRecord;

/// One entry produced by [`RecordBackend::scan`].
#[derive(Debug, Clone)]
pub enum ScannedRecord {
    /// A record that decoded cleanly.
    Decoded(CacheRecord),
    /// An entry whose payload could not be decoded.
    Malformed {
        /// Backend key of the entry (record id or file name).
        key: String,
        /// Decode error message.
        reason: String,
    },
}

/// Persistence primitives the vector store is built on.
///
/// Implementations only persist and enumerate; similarity scoring and the
/// skip-malformed policy live in [`VectorStore`](super::VectorStore).
/// `put` must be safe under concurrent calls (last write wins per id).
pub trait RecordBackend: Send + Sync {
    /// Backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Returns `true` if the backing medium is reachable.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Writes or overwrites the record keyed by `record.id`.
    fn put(&self, record: CacheRecord) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Fetches a record by id.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<CacheRecord>>> + Send;

    /// Enumerates every stored entry in unspecified order.
    ///
    /// Individual undecodable entries are reported as [`ScannedRecord::Malformed`];
    /// failure to enumerate at all is an error.
    fn scan(&self) -> impl std::future::Future<Output = StoreResult<Vec<ScannedRecord>>> + Send;

    /// Number of stored entries.
    fn count(&self) -> impl std::future::Future<Output = StoreResult<usize>> + Send;
}
