//! Parameter cache configuration and its environment overrides.

use std::time::Duration;

use tracing::warn;

use crate::config::{CACHE_TIMEOUT_VAR, USE_CACHE_VAR};
use crate::env::{EnvSource, flag_enabled};

/// Default time-to-live for cached parameters.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Configuration for the parameter cache.
///
/// The effective configuration is refreshed from the environment on every
/// lookup (see [`apply_env`](Self::apply_env)), so operators can toggle
/// caching or change the TTL of a warm process without redeploying.
///
/// ```rust
/// # use huginn::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(300));
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Whether lookups consult and populate the cache. Default: true.
    pub enabled: bool,
    /// Time-to-live for freshly fetched entries. Default: 60s.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Create a new config with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config with caching switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Enable or disable caching.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Apply `USE_SSM_CACHE` and `SSM_CACHE_TIMEOUT` from `env`.
    ///
    /// Unset variables leave the current values alone. `USE_SSM_CACHE`
    /// enables caching only for `true`/`TRUE`. `SSM_CACHE_TIMEOUT` must be a
    /// non-negative integer number of seconds; anything else is ignored and
    /// the previous TTL is kept.
    pub fn apply_env(&mut self, env: &dyn EnvSource) {
        if let Some(flag) = env.var(USE_CACHE_VAR) {
            self.enabled = flag_enabled(&flag);
        }

        if let Some(raw) = env.var(CACHE_TIMEOUT_VAR) {
            match raw.parse::<i64>() {
                Ok(secs) if secs >= 0 => self.ttl = Duration::from_secs(secs.unsigned_abs()),
                _ => warn!(
                    value = %raw,
                    kept_secs = self.ttl.as_secs(),
                    "ignoring invalid {CACHE_TIMEOUT_VAR}"
                ),
            }
        }
    }
}
