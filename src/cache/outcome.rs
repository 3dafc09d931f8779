//! Hit/miss accounting kept outside the cache.
//!
//! [`SemanticCache`](super::SemanticCache) never records outcomes itself; the
//! caller passes each [`LookupResult::outcome`](super::LookupResult::outcome)
//! to an [`OutcomeRecorder`] of its choosing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::CacheOutcome;

pub trait OutcomeRecorder: Send + Sync {
    fn record(&self, outcome: CacheOutcome);
}

impl<T: OutcomeRecorder + ?Sized> OutcomeRecorder for Arc<T> {
    fn record(&self, outcome: CacheOutcome) {
        (**self).record(outcome)
    }
}

/// Lock-free in-process hit/miss totals.
#[derive(Debug, Default)]
pub struct OutcomeCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl OutcomeCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> OutcomeSnapshot {
        OutcomeSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl OutcomeRecorder for OutcomeCounters {
    fn record(&self, outcome: CacheOutcome) {
        let counter = match outcome {
            CacheOutcome::Hit => &self.hits,
            CacheOutcome::Miss => &self.misses,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutcomeSnapshot {
    pub hits: u64,
    pub misses: u64,
}

impl OutcomeSnapshot {
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}
