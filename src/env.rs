//! Environment lookup.
//!
//! Operators steer the pipeline at runtime through environment variables
//! (`USE_SSM_CACHE`, `SSM_CACHE_TIMEOUT`, `ALWAYS_ERROR`). These are read on
//! every invocation rather than once at startup, so they are accessed through
//! [`EnvSource`] instead of `std::env` directly. [`ProcessEnv`] is the real
//! process environment; [`MapEnv`] is an in-memory source whose values can be
//! changed while a [`PipelineContext`](crate::PipelineContext) is live.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A source of environment variables.
pub trait EnvSource: Send + Sync {
    /// Current value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mutable in-memory environment.
///
/// ```rust
/// # use huginn::env::{EnvSource, MapEnv};
/// let env = MapEnv::new().with("USE_SSM_CACHE", "true");
/// env.set("SSM_CACHE_TIMEOUT", "30");
/// assert_eq!(env.var("SSM_CACHE_TIMEOUT").as_deref(), Some("30"));
/// ```
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MapEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set (or overwrite) a variable.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Unset a variable.
    pub fn remove(&self, key: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

/// Whether a boolean override is switched on.
///
/// Only the exact spellings `true` and `TRUE` count; everything else
/// (including `True`, `1`, the empty string) is off.
pub fn flag_enabled(value: &str) -> bool {
    matches!(value, "true" | "TRUE")
}
