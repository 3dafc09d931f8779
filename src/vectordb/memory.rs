//! In-process record backend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::backend::{RecordBackend, ScannedRecord};
use super::error::StoreResult;
use super::model::CacheRecord;

/// Records held in a shared `HashMap`. Clones share the same map.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    records: Arc<RwLock<HashMap<String, CacheRecord>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RecordBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn is_ready(&self) -> bool {
        true
    }

    async fn put(&self, record: CacheRecord) -> StoreResult<()> {
        self.records.write().insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<CacheRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn scan(&self) -> StoreResult<Vec<ScannedRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .cloned()
            .map(ScannedRecord::Decoded)
            .collect())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.len())
    }
}
