//! Parameter caching.
//!
//! [`ParameterCache`] fronts the remote configuration store so that the
//! destination addresses every stage needs (queue URL, table name, topic
//! ARN) cost a remote round trip only once per TTL per warm process.
//!
//! Lookup algorithm, per [`ParameterCache::resolve`] call:
//!
//! 1. Refresh [`CacheConfig`] from the environment.
//! 2. Enabled and a fresh entry exists: return it, no remote call.
//! 3. Otherwise fetch from the [`ParameterSource`](crate::providers::ParameterSource);
//!    errors propagate unchanged.
//! 4. Enabled: store the value with `expires_at = now + ttl`. The value is
//!    returned either way.
//!
//! A TTL of zero makes every lookup a miss that still writes its entry.

pub mod config;
pub mod parameter;

pub use config::{CacheConfig, DEFAULT_TTL};
pub use parameter::{CachedParameter, ParameterCache};
