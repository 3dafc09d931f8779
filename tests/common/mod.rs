//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use semcache::{
    CacheConfig, FileBackend, MockEmbedder, SemanticCache, VectorStore, init_tracing,
};

pub const DIM: usize = 3;

pub const FRANCE: &str = "What is the capital of France?";
pub const FRANCE_REPHRASED: &str = "France's capital city?";
pub const PYTHON: &str = "How do I sort a list in Python?";

pub type FileCache = SemanticCache<MockEmbedder, VectorStore<FileBackend>>;

/// Embedder mapping the scenario prompts onto unit axes.
pub fn scenario_embedder() -> MockEmbedder {
    MockEmbedder::new(DIM)
        .with_embedding(FRANCE, vec![1.0, 0.0, 0.0])
        .with_embedding(FRANCE_REPHRASED, vec![1.0, 0.0, 0.0])
        .with_embedding(PYTHON, vec![0.0, 1.0, 0.0])
}

pub fn file_cache(root: &Path, threshold: f32) -> FileCache {
    init_tracing();
    let store = VectorStore::new(FileBackend::new(root)).with_dimensions(DIM);
    SemanticCache::new(scenario_embedder(), store, CacheConfig::with_threshold(threshold))
        .expect("file cache should build")
}
