//! Tests for [`ParameterCache`]: TTL behaviour and environment overrides.
//!
//! Uses tokio's paused clock so expiry can be stepped deterministically.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::ScriptedSource;
use huginn::env::MapEnv;
use huginn::{CacheConfig, HuginnError, ParameterCache};

fn cache_with(source: &Arc<ScriptedSource>, env: &Arc<MapEnv>) -> ParameterCache {
    ParameterCache::new(source.clone(), env.clone())
}

fn source() -> Arc<ScriptedSource> {
    Arc::new(ScriptedSource::new().with("sqs_url", "https://queue/1"))
}

// ============================================================================
// Hit / miss / expiry
// ============================================================================

#[tokio::test(start_paused = true)]
async fn cold_start_fetches_and_stores() {
    let source = source();
    let cache = cache_with(&source, &Arc::new(MapEnv::new()));

    let value = cache.resolve("sqs_url").await.unwrap();

    assert_eq!(value.value, "https://queue/1");
    assert_eq!(source.calls("sqs_url"), 1);
    assert!(cache.entry("sqs_url").is_some());
}

#[tokio::test(start_paused = true)]
async fn second_lookup_within_ttl_is_a_hit() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("SSM_CACHE_TIMEOUT", "60"));
    let cache = cache_with(&source, &env);

    let first = cache.resolve("sqs_url").await.unwrap();
    tokio::time::advance(Duration::from_secs(59)).await;
    let second = cache.resolve("sqs_url").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(source.calls("sqs_url"), 1);
}

#[tokio::test(start_paused = true)]
async fn lookup_after_expiry_fetches_again() {
    let source = source();
    let cache = cache_with(&source, &Arc::new(MapEnv::new()));

    cache.resolve("sqs_url").await.unwrap();
    source.set("sqs_url", "https://queue/2");
    tokio::time::advance(Duration::from_secs(60)).await;

    let refreshed = cache.resolve("sqs_url").await.unwrap();

    assert_eq!(refreshed.value, "https://queue/2");
    assert_eq!(source.calls("sqs_url"), 2);
}

#[tokio::test(start_paused = true)]
async fn refresh_overwrites_entry_in_place() {
    let source = source();
    let cache = cache_with(&source, &Arc::new(MapEnv::new()));

    cache.resolve("sqs_url").await.unwrap();
    let first_expiry = cache.entry("sqs_url").unwrap().expires_at;
    tokio::time::advance(Duration::from_secs(61)).await;
    cache.resolve("sqs_url").await.unwrap();

    assert_eq!(cache.len(), 1);
    assert!(cache.entry("sqs_url").unwrap().expires_at > first_expiry);
}

#[tokio::test(start_paused = true)]
async fn zero_ttl_never_hits_but_still_writes() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("SSM_CACHE_TIMEOUT", "0"));
    let cache = cache_with(&source, &env);

    cache.resolve("sqs_url").await.unwrap();
    cache.resolve("sqs_url").await.unwrap();
    cache.resolve("sqs_url").await.unwrap();

    assert_eq!(source.calls("sqs_url"), 3);
    assert!(cache.entry("sqs_url").is_some());
}

#[tokio::test(start_paused = true)]
async fn names_are_cached_independently() {
    let source = Arc::new(
        ScriptedSource::new()
            .with("sqs_url", "q")
            .with("dynamodb_table_name", "t"),
    );
    let cache = cache_with(&source, &Arc::new(MapEnv::new()));

    cache.resolve("sqs_url").await.unwrap();
    cache.resolve("dynamodb_table_name").await.unwrap();
    cache.resolve("sqs_url").await.unwrap();

    assert_eq!(source.calls("sqs_url"), 1);
    assert_eq!(source.calls("dynamodb_table_name"), 1);
}

// ============================================================================
// Enable / disable
// ============================================================================

#[tokio::test(start_paused = true)]
async fn disabled_cache_fetches_every_time() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("USE_SSM_CACHE", "false"));
    let cache = cache_with(&source, &env);

    for _ in 0..4 {
        cache.resolve("sqs_url").await.unwrap();
    }

    assert_eq!(source.calls("sqs_url"), 4);
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn uppercase_true_enables_cache() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("USE_SSM_CACHE", "TRUE"));
    let cache = ParameterCache::with_config(source.clone(), env, CacheConfig::disabled());

    cache.resolve("sqs_url").await.unwrap();
    cache.resolve("sqs_url").await.unwrap();

    assert_eq!(source.calls("sqs_url"), 1);
}

#[tokio::test(start_paused = true)]
async fn disabling_mid_run_keeps_entries_but_stops_using_them() {
    let source = source();
    let env = Arc::new(MapEnv::new());
    let cache = cache_with(&source, &env);

    cache.resolve("sqs_url").await.unwrap();
    env.set("USE_SSM_CACHE", "false");
    cache.resolve("sqs_url").await.unwrap();

    assert_eq!(source.calls("sqs_url"), 2);
    assert!(cache.entry("sqs_url").is_some(), "entry must survive disabling");

    env.set("USE_SSM_CACHE", "true");
    cache.resolve("sqs_url").await.unwrap();
    assert_eq!(source.calls("sqs_url"), 2, "still-fresh entry served after re-enabling");
}

#[tokio::test(start_paused = true)]
async fn removing_flag_keeps_last_setting() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("USE_SSM_CACHE", "false"));
    let cache = cache_with(&source, &env);

    cache.resolve("sqs_url").await.unwrap();
    env.remove("USE_SSM_CACHE");
    cache.resolve("sqs_url").await.unwrap();

    assert!(!cache.config().enabled);
    assert_eq!(source.calls("sqs_url"), 2);
}

// ============================================================================
// TTL overrides
// ============================================================================

#[tokio::test(start_paused = true)]
async fn invalid_ttl_override_keeps_previous_ttl() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("SSM_CACHE_TIMEOUT", "10"));
    let cache = cache_with(&source, &env);

    cache.resolve("sqs_url").await.unwrap();
    assert_eq!(cache.config().ttl, Duration::from_secs(10));

    for bad in ["-5", "abc"] {
        env.set("SSM_CACHE_TIMEOUT", bad);
        cache.resolve("sqs_url").await.unwrap();
        assert_eq!(cache.config().ttl, Duration::from_secs(10), "after {bad:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn maximal_ttl_is_accepted_and_served() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("SSM_CACHE_TIMEOUT", i64::MAX.to_string()));
    let cache = cache_with(&source, &env);

    cache.resolve("sqs_url").await.unwrap();
    tokio::time::advance(Duration::from_secs(86_400 * 365)).await;
    cache.resolve("sqs_url").await.unwrap();

    assert_eq!(cache.config().ttl, Duration::from_secs(i64::MAX.unsigned_abs()));
    assert_eq!(source.calls("sqs_url"), 1);
}

#[tokio::test(start_paused = true)]
async fn ttl_change_applies_to_next_write() {
    let source = source();
    let env = Arc::new(MapEnv::new().with("SSM_CACHE_TIMEOUT", "5"));
    let cache = cache_with(&source, &env);

    cache.resolve("sqs_url").await.unwrap();
    env.set("SSM_CACHE_TIMEOUT", "120");
    tokio::time::advance(Duration::from_secs(6)).await;
    cache.resolve("sqs_url").await.unwrap(); // expired under the old TTL
    tokio::time::advance(Duration::from_secs(100)).await;
    cache.resolve("sqs_url").await.unwrap(); // fresh under the new TTL

    assert_eq!(source.calls("sqs_url"), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn not_found_propagates_and_caches_nothing() {
    let source = Arc::new(ScriptedSource::new());
    let cache = cache_with(&source, &Arc::new(MapEnv::new()));

    let err = cache.resolve("missing").await.unwrap_err();

    assert!(matches!(err, HuginnError::ParameterNotFound(ref n) if n == "missing"));
    assert!(cache.entry("missing").is_none());
}

#[tokio::test(start_paused = true)]
async fn remote_failure_is_not_masked_by_stale_entry() {
    let source = source();
    let cache = cache_with(&source, &Arc::new(MapEnv::new()));

    cache.resolve("sqs_url").await.unwrap();
    tokio::time::advance(Duration::from_secs(61)).await;
    source.make_unavailable("sqs_url");

    let err = cache.resolve("sqs_url").await.unwrap_err();
    assert!(matches!(err, HuginnError::RemoteUnavailable { .. }));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolves_share_one_entry() {
    let source = source();
    let cache = Arc::new(cache_with(&source, &Arc::new(MapEnv::new())));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move { cache.resolve("sqs_url").await }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap().unwrap().value, "https://queue/1");
    }

    // Racing cold lookups may each fetch; afterwards there is one entry.
    assert!(source.calls("sqs_url") >= 1);
    assert_eq!(cache.len(), 1);
    let before = source.calls("sqs_url");
    cache.resolve("sqs_url").await.unwrap();
    assert_eq!(source.calls("sqs_url"), before);
}
