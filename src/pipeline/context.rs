//! Shared per-process pipeline state and its builder.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cache::{CacheConfig, ParameterCache};
use crate::config::{ALWAYS_ERROR_VAR, ParameterNames};
use crate::env::{EnvSource, ProcessEnv, flag_enabled};
use crate::providers::{MessageQueue, Notifier, ParameterSource, RecordStore};
use crate::types::SortKeyClock;
use crate::{HuginnError, Result};

/// Everything a pipeline stage needs, built once per warm process.
///
/// Holds the parameter cache, the collaborator handles, the environment
/// and the sort-key clock. Stages borrow it through an `Arc`; nothing is
/// kept in globals, so several independent contexts can coexist (one per
/// test, for instance).
///
/// ```rust,no_run
/// # use std::sync::Arc;
/// # use huginn::{PipelineContext, env::MapEnv, providers::ParameterSource};
/// # fn source() -> Arc<dyn ParameterSource> { unimplemented!() }
/// let ctx = PipelineContext::builder()
///     .parameter_source(source())
///     .environment(Arc::new(MapEnv::new()))
///     .build()?;
/// # Ok::<(), huginn::HuginnError>(())
/// ```
pub struct PipelineContext {
    cache: ParameterCache,
    names: ParameterNames,
    env: Arc<dyn EnvSource>,
    queue: Option<Arc<dyn MessageQueue>>,
    store: Option<Arc<dyn RecordStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    sort_keys: SortKeyClock,
    always_error: AtomicBool,
}

impl PipelineContext {
    /// Create a new builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// The parameter cache.
    pub fn cache(&self) -> &ParameterCache {
        &self.cache
    }

    /// Logical parameter names for the destination addresses.
    pub fn names(&self) -> &ParameterNames {
        &self.names
    }

    /// Resolve a destination address through the cache.
    ///
    /// Any lookup failure is wrapped in [`HuginnError::ConfigUnresolved`].
    pub async fn resolve_address(&self, name: &str) -> Result<String> {
        self.cache
            .resolve(name)
            .await
            .map(|parameter| parameter.value)
            .map_err(|source| HuginnError::ConfigUnresolved {
                name: name.to_string(),
                source: Box::new(source),
            })
    }

    /// Whether the `ALWAYS_ERROR` override is on.
    ///
    /// Re-read on every call; an unset variable keeps the last seen state
    /// (initially off).
    pub fn always_error(&self) -> bool {
        if let Some(flag) = self.env.var(ALWAYS_ERROR_VAR) {
            self.always_error
                .store(flag_enabled(&flag), Ordering::Relaxed);
        }
        self.always_error.load(Ordering::Relaxed)
    }

    /// Next record sort key.
    pub fn next_sort_key(&self) -> String {
        self.sort_keys.next_key()
    }

    pub(crate) fn queue(&self) -> Result<&dyn MessageQueue> {
        self.queue
            .as_deref()
            .ok_or(HuginnError::NotConfigured("message queue"))
    }

    pub(crate) fn record_store(&self) -> Result<&dyn RecordStore> {
        self.store
            .as_deref()
            .ok_or(HuginnError::NotConfigured("record store"))
    }

    pub(crate) fn notifier(&self) -> Result<&dyn Notifier> {
        self.notifier
            .as_deref()
            .ok_or(HuginnError::NotConfigured("notifier"))
    }
}

impl std::fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineContext")
            .field("cache", &self.cache)
            .field("names", &self.names)
            .field("queue", &self.queue.as_ref().map(|q| q.name().to_string()))
            .field("store", &self.store.as_ref().map(|s| s.name().to_string()))
            .field("notifier", &self.notifier.as_ref().map(|n| n.name().to_string()))
            .finish()
    }
}

/// Builder for [`PipelineContext`].
///
/// Only the parameter source is mandatory. Each stage checks for the
/// collaborator it needs when it runs and fails with
/// [`HuginnError::NotConfigured`] if it is missing, so an ingest-only
/// process never has to construct a record store.
pub struct PipelineBuilder {
    source: Option<Arc<dyn ParameterSource>>,
    queue: Option<Arc<dyn MessageQueue>>,
    store: Option<Arc<dyn RecordStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    env: Arc<dyn EnvSource>,
    cache_config: CacheConfig,
    names: ParameterNames,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            queue: None,
            store: None,
            notifier: None,
            env: Arc::new(ProcessEnv),
            cache_config: CacheConfig::default(),
            names: ParameterNames::default(),
        }
    }

    /// Set the remote configuration store.
    pub fn parameter_source(mut self, source: Arc<dyn ParameterSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the queue the ingest stage publishes to.
    pub fn queue(mut self, queue: Arc<dyn MessageQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the store the consumer writes records to.
    pub fn record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the notifier used by the dead-letter stage.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the environment overrides are read from (default: process env).
    pub fn environment(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Set the initial cache configuration, before environment overrides.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Override the logical parameter names.
    pub fn parameter_names(mut self, names: ParameterNames) -> Self {
        self.names = names;
        self
    }

    /// Build the context.
    pub fn build(self) -> Result<PipelineContext> {
        let source = self
            .source
            .ok_or(HuginnError::NotConfigured("parameter source"))?;

        Ok(PipelineContext {
            cache: ParameterCache::with_config(source, Arc::clone(&self.env), self.cache_config),
            names: self.names,
            env: self.env,
            queue: self.queue,
            store: self.store,
            notifier: self.notifier,
            sort_keys: SortKeyClock::new(),
            always_error: AtomicBool::new(false),
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
