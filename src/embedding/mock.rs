use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::EmbeddingProvider;
use super::error::EmbeddingError;
use super::stub::StubEmbedder;

/// Embedder with a fixed text → vector table, failure toggle and call counter.
///
/// Text missing from the table falls back to [`StubEmbedder`] output.
#[derive(Debug)]
pub struct MockEmbedder {
    dimensions: usize,
    table: RwLock<HashMap<String, Vec<f32>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
    fallback: StubEmbedder,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            table: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            fallback: StubEmbedder::new(dimensions),
        }
    }

    /// Maps `text` to `embedding` (returned verbatim, even if malformed).
    pub fn with_embedding(self, text: &str, embedding: Vec<f32>) -> Self {
        self.set_embedding(text, embedding);
        self
    }

    pub fn set_embedding(&self, text: &str, embedding: Vec<f32>) {
        self.table.write().insert(text.to_string(), embedding);
    }

    /// Makes every subsequent call fail with [`EmbeddingError::ProviderFailure`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `embed` calls so far (including failed ones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for MockEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ProviderFailure {
                reason: "mock embedder set to fail".to_string(),
            });
        }

        if let Some(embedding) = self.table.read().get(text) {
            return Ok(embedding.clone());
        }

        self.fallback.embed_sync(text)
    }
}
