use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::backend::{RecordBackend, ScannedRecord};
use super::error::{StoreError, StoreResult};
use super::model::CacheRecord;

/// In-memory backend with failure injection for tests.
#[derive(Debug, Default)]
pub struct MockRecordBackend {
    records: RwLock<HashMap<String, CacheRecord>>,
    malformed: RwLock<Vec<(String, String)>>,
    unavailable: AtomicBool,
    put_calls: AtomicUsize,
    scan_calls: AtomicUsize,
}

impl MockRecordBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Adds an entry that scans report as undecodable.
    pub fn insert_malformed(&self, key: &str, reason: &str) {
        self.malformed
            .write()
            .push((key.to_string(), reason.to_string()));
    }

    /// Inserts a record directly, bypassing any store-level validation.
    pub fn insert_raw(&self, record: CacheRecord) {
        self.records.write().insert(record.id.clone(), record);
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn scan_calls(&self) -> usize {
        self.scan_calls.load(Ordering::SeqCst)
    }

    pub fn record_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.records.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("mock", "backend marked unavailable"));
        }
        Ok(())
    }
}

impl RecordBackend for MockRecordBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_ready(&self) -> bool {
        self.check_available().is_ok()
    }

    async fn put(&self, record: CacheRecord) -> StoreResult<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.insert_raw(record);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<CacheRecord>> {
        self.check_available()?;
        Ok(self.records.read().get(id).cloned())
    }

    async fn scan(&self) -> StoreResult<Vec<ScannedRecord>> {
        self.scan_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut scanned: Vec<_> = self
            .records
            .read()
            .values()
            .cloned()
            .map(ScannedRecord::Decoded)
            .collect();
        scanned.extend(
            self.malformed
                .read()
                .iter()
                .map(|(key, reason)| ScannedRecord::Malformed {
                    key: key.clone(),
                    reason: reason.clone(),
                }),
        );
        Ok(scanned)
    }

    async fn count(&self) -> StoreResult<usize> {
        self.check_available()?;
        Ok(self.records.read().len() + self.malformed.read().len())
    }
}
