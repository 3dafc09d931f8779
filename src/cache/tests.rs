use std::sync::Arc;

use super::*;
use crate::embedding::MockEmbedder;
use crate::vectordb::{CacheRecord, MemoryBackend, MockRecordBackend, VectorStore};

const FRANCE: &str = "What is the capital of France?";
const FRANCE_REPHRASED: &str = "France's capital city?";
const PYTHON: &str = "How do I sort a list in Python?";

fn scenario_cache(threshold: f32) -> MockSemanticCache {
    let cache = MockSemanticCache::new_mock(3, CacheConfig::with_threshold(threshold))
        .expect("mock cache should build");
    cache.embedder().set_embedding(FRANCE, vec![1.0, 0.0, 0.0]);
    cache.embedder().set_embedding(FRANCE_REPHRASED, vec![1.0, 0.0, 0.0]);
    cache.embedder().set_embedding(PYTHON, vec![0.0, 1.0, 0.0]);
    cache
}

#[tokio::test]
async fn test_new_mock_starts_empty() {
    let cache = scenario_cache(0.85);

    assert!(cache.is_ready().await);
    assert_eq!(cache.stats().await.unwrap().size, 0);
    assert_eq!(cache.similarity_threshold(), 0.85);
}

#[tokio::test]
async fn test_lookup_on_empty_cache_is_miss_with_token() {
    let cache = scenario_cache(0.85);

    let result = cache.lookup(FRANCE).await.unwrap();

    assert!(!result.is_hit());
    assert_eq!(result.outcome(), CacheOutcome::Miss);
    let token = result.into_token().expect("miss carries token");
    assert_eq!(token.embedding(), &[1.0, 0.0, 0.0]);
    assert!(token.matches_prompt(FRANCE));
}

#[tokio::test]
async fn test_rephrased_prompt_hits_stored_response() {
    let cache = scenario_cache(0.85);
    cache.store(FRANCE, "Paris", "gpt-4o", None).await.unwrap();

    let result = cache.lookup(FRANCE_REPHRASED).await.unwrap();

    let hit = result.hit().expect("should hit");
    assert_eq!(hit.response, "Paris");
    assert_eq!(hit.similarity, 1.0);
    assert_eq!(hit.model_tag, "gpt-4o");
}

#[tokio::test]
async fn test_unrelated_prompt_misses() {
    let cache = scenario_cache(0.85);
    cache.store(FRANCE, "Paris", "gpt-4o", None).await.unwrap();

    let result = cache.lookup(PYTHON).await.unwrap();

    assert_eq!(result.outcome(), CacheOutcome::Miss);
}

#[tokio::test]
async fn test_embedder_failure_is_error_not_miss() {
    let cache = scenario_cache(0.85);
    cache.store(FRANCE, "Paris", "gpt-4o", None).await.unwrap();
    cache.embedder().set_failing(true);

    let err = cache.lookup(FRANCE).await.unwrap_err();

    assert!(err.is_embedding_failure());
    assert_eq!(cache.stats().await.unwrap().size, 1);
}

#[tokio::test]
async fn test_store_embedder_failure_stores_nothing() {
    let cache = scenario_cache(0.85);
    cache.embedder().set_failing(true);

    let err = cache.store(FRANCE, "Paris", "gpt-4o", None).await.unwrap_err();

    assert!(matches!(err, SemanticCacheError::EmbeddingFailed { .. }));
    assert_eq!(cache.index().backend().put_calls(), 0);
}

#[tokio::test]
async fn test_wrong_length_embedding_is_embedding_failure() {
    let cache = scenario_cache(0.85);
    cache.embedder().set_embedding("short", vec![1.0, 0.0]);

    let err = cache.lookup("short").await.unwrap_err();

    assert!(err.is_embedding_failure());
}

#[tokio::test]
async fn test_non_finite_embedding_is_embedding_failure() {
    let cache = scenario_cache(0.85);
    cache.embedder().set_embedding("nan", vec![f32::NAN, 0.0, 0.0]);

    let err = cache.lookup("nan").await.unwrap_err();

    assert!(err.is_embedding_failure());
}

#[tokio::test]
async fn test_round_trip_at_threshold_one() {
    let cache = MockSemanticCache::new_mock(8, CacheConfig::with_threshold(1.0)).unwrap();

    cache
        .store("any prompt at all", "stored answer", "m", None)
        .await
        .unwrap();
    let result = cache.lookup("any prompt at all").await.unwrap();

    let hit = result.hit().expect("identical prompt should hit at 1.0");
    assert_eq!(hit.response, "stored answer");
    assert_eq!(hit.similarity, 1.0);
}

#[tokio::test]
async fn test_repeated_miss_does_not_mutate_store() {
    let cache = scenario_cache(0.85);

    let first = cache.lookup(PYTHON).await.unwrap();
    let second = cache.lookup(PYTHON).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.stats().await.unwrap().size, 0);
    assert_eq!(cache.index().backend().put_calls(), 0);
}

#[tokio::test]
async fn test_store_reuses_lookup_token() {
    let cache = scenario_cache(0.85);

    let token = cache.lookup(PYTHON).await.unwrap().into_token();
    assert_eq!(cache.embedder().calls(), 1);

    cache
        .store(PYTHON, "use sorted()", "m", token)
        .await
        .unwrap();

    assert_eq!(cache.embedder().calls(), 1);
    assert_eq!(cache.stats().await.unwrap().size, 1);
}

#[tokio::test]
async fn test_store_ignores_token_for_other_prompt() {
    let cache = scenario_cache(0.85);

    let token = cache.lookup(PYTHON).await.unwrap().into_token();
    let id = cache.store(FRANCE, "Paris", "m", token).await.unwrap();

    assert_eq!(cache.embedder().calls(), 2);
    let stored = cache.index().get(&id).await.unwrap().unwrap();
    assert_eq!(stored.embedding, vec![1.0, 0.0, 0.0]);
    assert_eq!(stored.prompt, FRANCE);
}

#[tokio::test]
async fn test_unbound_token_is_reused_for_any_prompt() {
    let cache = scenario_cache(0.85);

    let token = cache
        .lookup_embedding(vec![0.0, 0.0, 1.0])
        .await
        .unwrap()
        .into_token();
    let id = cache.store(FRANCE, "Paris", "m", token).await.unwrap();

    assert_eq!(cache.embedder().calls(), 0);
    let stored = cache.index().get(&id).await.unwrap().unwrap();
    assert_eq!(stored.embedding, vec![0.0, 0.0, 1.0]);
}

#[tokio::test]
async fn test_lookup_embedding_hits_without_embedding_call() {
    let cache = scenario_cache(0.85);
    cache.store(FRANCE, "Paris", "m", None).await.unwrap();
    let calls_after_store = cache.embedder().calls();

    let result = cache.lookup_embedding(vec![0.99, 0.1, 0.0]).await.unwrap();

    assert!(result.is_hit());
    assert_eq!(cache.embedder().calls(), calls_after_store);
}

#[tokio::test]
async fn test_lookup_embedding_rejects_wrong_length() {
    let cache = scenario_cache(0.85);

    let err = cache.lookup_embedding(vec![1.0, 0.0]).await.unwrap_err();

    assert!(err.is_embedding_failure());
}

#[tokio::test]
async fn test_store_returns_distinct_ids() {
    let cache = scenario_cache(0.85);

    let first = cache.store(FRANCE, "Paris", "m", None).await.unwrap();
    let second = cache.store(FRANCE, "Paris", "m", None).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(cache.stats().await.unwrap().size, 2);
}

#[tokio::test]
async fn test_stored_record_has_timestamp_and_tag() {
    let cache = scenario_cache(0.85);

    let before = chrono::Utc::now().timestamp_millis();
    let id = cache.store(FRANCE, "Paris", "gpt-4o", None).await.unwrap();
    let after = chrono::Utc::now().timestamp_millis();

    let record = cache.index().get(&id).await.unwrap().unwrap();
    assert_eq!(record.response, "Paris");
    assert_eq!(record.model_tag, "gpt-4o");
    assert!(record.created_at >= before && record.created_at <= after);
}

#[tokio::test]
async fn test_best_of_several_matches_is_returned() {
    let cache = scenario_cache(0.5);
    cache.embedder().set_embedding("close", vec![0.95, 0.312_249_9, 0.0]);
    cache.embedder().set_embedding("closer", vec![1.0, 0.05, 0.0]);
    cache.store("close", "close answer", "m", None).await.unwrap();
    cache.store("closer", "closer answer", "m", None).await.unwrap();

    let result = cache.lookup(FRANCE).await.unwrap();

    assert_eq!(result.hit().unwrap().response, "closer answer");
}

#[tokio::test]
async fn test_match_below_threshold_misses() {
    let cache = scenario_cache(0.9);
    cache.embedder().set_embedding("near", vec![0.8, 0.6, 0.0]);
    cache.store("near", "near answer", "m", None).await.unwrap();

    let result = cache.lookup(FRANCE).await.unwrap();

    assert!(!result.is_hit());
}

#[tokio::test]
async fn test_threshold_zero_hits_any_non_negative_match() {
    let cache = scenario_cache(0.0);
    cache.store(PYTHON, "use sorted()", "m", None).await.unwrap();

    let result = cache.lookup(FRANCE).await.unwrap();

    let hit = result.hit().expect("orthogonal vectors score 0.0");
    assert_eq!(hit.similarity, 0.0);
}

#[test]
fn test_invalid_thresholds_rejected() {
    for threshold in [-0.1, 1.01, f32::NAN, f32::INFINITY] {
        let err = MockSemanticCache::new_mock(3, CacheConfig::with_threshold(threshold)).unwrap_err();
        assert!(matches!(err, SemanticCacheError::Config { .. }));
    }
}

#[test]
fn test_default_config_threshold() {
    assert_eq!(CacheConfig::default().similarity_threshold, 0.85);
    assert!(CacheConfig::with_threshold(0.0).validate().is_ok());
    assert!(CacheConfig::with_threshold(1.0).validate().is_ok());
}

#[test]
fn test_dimension_disagreement_rejected_at_construction() {
    let store = VectorStore::new(MockRecordBackend::new()).with_dimensions(4);

    let err = SemanticCache::new(MockEmbedder::new(3), store, CacheConfig::default()).unwrap_err();

    assert!(matches!(err, SemanticCacheError::Config { .. }));
}

#[test]
fn test_zero_dimension_embedder_rejected() {
    let store = VectorStore::new(MemoryBackend::new());

    let err = SemanticCache::new(MockEmbedder::new(0), store, CacheConfig::default()).unwrap_err();

    assert!(matches!(err, SemanticCacheError::Config { .. }));
}

#[tokio::test]
async fn test_unconstrained_index_accepts_embedder_dimension() {
    let store = VectorStore::new(MemoryBackend::new());
    let cache = SemanticCache::new(MockEmbedder::new(16), store, CacheConfig::default()).unwrap();

    cache.store("hello", "world", "m", None).await.unwrap();

    assert_eq!(cache.verify_store().await.unwrap(), 1);
}

#[tokio::test]
async fn test_verify_store_detects_foreign_dimension() {
    let cache = scenario_cache(0.85);
    cache.store(FRANCE, "Paris", "m", None).await.unwrap();
    cache.index().backend().insert_raw(CacheRecord::new(
        "legacy",
        "old prompt",
        vec![1.0, 0.0],
        "old response",
        "m",
    ));

    let err = cache.verify_store().await.unwrap_err();

    assert!(matches!(err, SemanticCacheError::Config { reason } if reason.contains("legacy")));
}

#[tokio::test]
async fn test_store_unavailable_surfaces_as_error() {
    let cache = scenario_cache(0.85);
    cache.index().backend().set_unavailable(true);

    let lookup_err = cache.lookup(FRANCE).await.unwrap_err();
    let store_err = cache.store(FRANCE, "Paris", "m", None).await.unwrap_err();
    let stats_err = cache.stats().await.unwrap_err();

    assert!(lookup_err.is_store_unavailable());
    assert!(store_err.is_store_unavailable());
    assert!(stats_err.is_store_unavailable());
    assert!(!cache.is_ready().await);
}

#[tokio::test]
async fn test_malformed_records_do_not_break_lookup() {
    let cache = scenario_cache(0.85);
    cache.store(FRANCE, "Paris", "m", None).await.unwrap();
    cache.index().backend().insert_malformed("broken.rkyv", "truncated");

    let result = cache.lookup(FRANCE_REPHRASED).await.unwrap();

    assert_eq!(result.hit().unwrap().response, "Paris");
    assert_eq!(cache.stats().await.unwrap().size, 2);
}

#[tokio::test]
async fn test_handle_shares_cache_across_tasks() {
    let cache = scenario_cache(0.85);
    cache.store(FRANCE, "Paris", "m", None).await.unwrap();
    let handle = SemanticCacheHandle::new(cache);

    let mut tasks = Vec::new();
    for i in 0..16 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            let prompt = if i % 2 == 0 { FRANCE_REPHRASED } else { PYTHON };
            handle.lookup(prompt).await.map(|r| r.outcome())
        }));
    }

    let mut hits = 0;
    for task in tasks {
        if task.await.unwrap().unwrap().is_hit() {
            hits += 1;
        }
    }

    assert_eq!(hits, 8);
    assert_eq!(handle.stats().await.unwrap().size, 1);
    assert_eq!(handle.strong_count(), 1);
}

#[tokio::test]
async fn test_handle_store_then_lookup() {
    let handle = SemanticCacheHandle::new(scenario_cache(0.85));
    let other = handle.clone();

    let token = handle.lookup(PYTHON).await.unwrap().into_token();
    other.store(PYTHON, "use sorted()", "m", token).await.unwrap();

    assert!(handle.lookup(PYTHON).await.unwrap().is_hit());
    assert_eq!(handle.strong_count(), 2);
    assert_eq!(handle.cache().embedder().calls(), 2);
}

#[tokio::test]
async fn test_outcome_counters_track_lookups() {
    let cache = scenario_cache(0.85);
    let counters = Arc::new(OutcomeCounters::new());
    cache.store(FRANCE, "Paris", "m", None).await.unwrap();

    for prompt in [FRANCE, FRANCE_REPHRASED, PYTHON] {
        let result = cache.lookup(prompt).await.unwrap();
        counters.record(result.outcome());
    }

    let snapshot = counters.snapshot();
    assert_eq!(snapshot.hits, 2);
    assert_eq!(snapshot.misses, 1);
    assert_eq!(snapshot.total(), 3);
    assert!((snapshot.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_outcome_labels() {
    assert_eq!(CacheOutcome::Hit.to_string(), "HIT");
    assert_eq!(CacheOutcome::Miss.as_str(), "MISS");
    assert!(CacheOutcome::Hit.is_hit());
    assert_eq!(OutcomeSnapshot::default().hit_rate(), 0.0);
}

#[test]
fn test_token_binding() {
    let bound = EmbeddingToken::for_prompt("a", vec![1.0]);
    let unbound = EmbeddingToken::unbound(vec![1.0]);

    assert!(bound.matches_prompt("a"));
    assert!(!bound.matches_prompt("b"));
    assert!(unbound.matches_prompt("anything"));
    assert_eq!(unbound.fingerprint(), None);
}

#[tokio::test]
async fn test_store_rejects_wrong_length_token() {
    let store = VectorStore::new(MemoryBackend::new());
    let cache = SemanticCache::new(MockEmbedder::new(3), store, CacheConfig::default()).unwrap();

    let err = cache
        .store("p", "r", "m", Some(EmbeddingToken::unbound(vec![1.0, 0.0])))
        .await
        .unwrap_err();

    assert!(err.is_embedding_failure());
    assert_eq!(cache.stats().await.unwrap().size, 0);
    assert_eq!(cache.verify_store().await.unwrap(), 0);
}

#[tokio::test]
async fn test_store_rejects_non_finite_bound_token() {
    let store = VectorStore::new(MemoryBackend::new());
    let cache = SemanticCache::new(MockEmbedder::new(3), store, CacheConfig::default()).unwrap();
    let token = EmbeddingToken::for_prompt("p", vec![1.0, f32::INFINITY, 0.0]);

    let err = cache.store("p", "r", "m", Some(token)).await.unwrap_err();

    assert!(err.is_embedding_failure());
    assert_eq!(cache.embedder().calls(), 0);
    assert_eq!(cache.stats().await.unwrap().size, 0);
}
