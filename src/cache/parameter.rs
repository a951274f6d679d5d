//! TTL cache in front of the remote parameter store.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::config::CacheConfig;
use crate::Result;
use crate::env::EnvSource;
use crate::providers::ParameterSource;
use crate::telemetry;
use crate::types::Parameter;

/// A cached parameter value and the instant it stops being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedParameter {
    pub value: Parameter,
    pub expires_at: Instant,
}

impl CachedParameter {
    /// Whether the entry may still be served at `now`.
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Process-local TTL cache fronting a [`ParameterSource`].
///
/// One entry per parameter name, overwritten on every refresh and never
/// evicted otherwise. Concurrent refreshes of the same name are
/// last-write-wins. Entries are held in a moka map without capacity or TTL
/// limits; freshness is judged per entry against the TTL in force when it
/// was written, so TTL changes apply to new entries only.
///
/// The effective [`CacheConfig`] is refreshed from the environment at the
/// start of every [`resolve`](Self::resolve). Disabling the cache stops
/// entries being consulted or written without clearing them; re-enabling
/// makes any still-fresh entries visible again.
pub struct ParameterCache {
    entries: moka::sync::Cache<String, CachedParameter>,
    config: RwLock<CacheConfig>,
    source: Arc<dyn ParameterSource>,
    env: Arc<dyn EnvSource>,
}

impl ParameterCache {
    /// Create a cache with the default configuration.
    pub fn new(source: Arc<dyn ParameterSource>, env: Arc<dyn EnvSource>) -> Self {
        Self::with_config(source, env, CacheConfig::default())
    }

    /// Create a cache whose configuration starts from `config` before
    /// environment overrides are applied.
    pub fn with_config(
        source: Arc<dyn ParameterSource>,
        env: Arc<dyn EnvSource>,
        config: CacheConfig,
    ) -> Self {
        Self {
            entries: moka::sync::Cache::builder().build(),
            config: RwLock::new(config),
            source,
            env,
        }
    }

    /// Resolve `name` to its value, from cache when fresh, else from the
    /// remote source.
    ///
    /// Remote failures are returned as-is; a stale entry is never served in
    /// their place.
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn resolve(&self, name: &str) -> Result<Parameter> {
        let config = self.refresh_config();

        if config.enabled {
            if let Some(entry) = self.entries.get(name) {
                if entry.is_fresh(Instant::now()) {
                    debug!(parameter = name, "parameter served from cache");
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL,
                        "parameter" => name.to_owned(),
                    )
                    .increment(1);
                    return Ok(entry.value);
                }
            }
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL,
            "parameter" => name.to_owned(),
        )
        .increment(1);

        let value = match self.source.fetch(name).await {
            Ok(value) => {
                metrics::counter!(telemetry::PARAMETER_FETCHES_TOTAL,
                    "parameter" => name.to_owned(),
                    "status" => "ok",
                )
                .increment(1);
                value
            }
            Err(e) => {
                metrics::counter!(telemetry::PARAMETER_FETCHES_TOTAL,
                    "parameter" => name.to_owned(),
                    "status" => "error",
                )
                .increment(1);
                warn!(parameter = name, error = %e, "parameter fetch failed");
                return Err(e);
            }
        };

        if config.enabled {
            debug!(parameter = name, ttl_secs = config.ttl.as_secs(), "parameter not cached, storing");
            self.entries.insert(
                name.to_string(),
                CachedParameter {
                    value: value.clone(),
                    expires_at: expiry(Instant::now(), config.ttl),
                },
            );
        }

        Ok(value)
    }

    /// The configuration in force after the most recent refresh.
    pub fn config(&self) -> CacheConfig {
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Raw entry for `name`, fresh or not.
    pub fn entry(&self, name: &str) -> Option<CachedParameter> {
        self.entries.get(name)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-read environment overrides into the stored configuration and
    /// return the result.
    fn refresh_config(&self) -> CacheConfig {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        config.apply_env(self.env.as_ref());
        *config
    }
}

/// Expiry for an entry written at `now`. TTLs too large to represent are
/// capped at [`FAR_FUTURE`].
fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Roughly thirty years; effectively never.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

impl std::fmt::Debug for ParameterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterCache")
            .field("source", &self.source.name())
            .field("config", &self.config())
            .finish()
    }
}
