//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use huginn::env::MapEnv;
use huginn::providers::{MessageQueue, Notifier, ParameterSource, RecordStore};
use huginn::{HuginnError, Parameter, PipelineContext, Result, StoredRecord};

// ============================================================================
// Parameter source
// ============================================================================

/// Parameter source with fixed values and per-name call counters.
///
/// Unknown names fail with `ParameterNotFound`; names marked unavailable
/// fail with `RemoteUnavailable`.
#[derive(Default)]
pub struct ScriptedSource {
    values: Mutex<HashMap<String, String>>,
    unavailable: Mutex<Vec<String>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    pub fn make_unavailable(&self, name: &str) {
        self.unavailable.lock().unwrap().push(name.to_string());
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl ParameterSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, name: &str) -> Result<Parameter> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default() += 1;

        if self.unavailable.lock().unwrap().iter().any(|n| n == name) {
            return Err(HuginnError::RemoteUnavailable {
                name: name.to_string(),
                message: "connection reset".into(),
            });
        }

        self.values
            .lock()
            .unwrap()
            .get(name)
            .map(|value| Parameter::new(name, value.as_str()))
            .ok_or_else(|| HuginnError::ParameterNotFound(name.to_string()))
    }
}

// ============================================================================
// Queue
// ============================================================================

/// Queue that records every send and answers with `id-<n>`, or fails every
/// send when `failing`.
#[derive(Default)]
pub struct RecordingQueue {
    pub sent: Mutex<Vec<(String, String, i32)>>,
    failing: bool,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String, i32)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageQueue for RecordingQueue {
    fn name(&self) -> &str {
        "recording-queue"
    }

    async fn send(&self, queue_url: &str, body: &str, delay_seconds: i32) -> Result<String> {
        if self.failing {
            return Err(HuginnError::PublishFailed("queue does not exist".into()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((queue_url.to_string(), body.to_string(), delay_seconds));
        Ok(format!("id-{}", sent.len()))
    }
}

// ============================================================================
// Record store
// ============================================================================

/// Store that records every put; optionally fails the n-th put (1-based).
#[derive(Default)]
pub struct RecordingStore {
    puts: Mutex<Vec<(String, StoredRecord)>>,
    attempts: AtomicUsize,
    fail_on: Option<usize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on: Some(attempt),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<(String, StoredRecord)> {
        self.puts.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    fn name(&self) -> &str {
        "recording-store"
    }

    async fn put(&self, table: &str, record: &StoredRecord) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(attempt) {
            return Err(HuginnError::StoreWriteFailed(
                "ProvisionedThroughputExceededException".into(),
            ));
        }
        self.puts
            .lock()
            .unwrap()
            .push((table.to_string(), record.clone()));
        Ok(())
    }
}

// ============================================================================
// Notifier
// ============================================================================

/// Notifier that records every publish; optionally fails all of them.
#[derive(Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<(String, String)>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording-notifier"
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<String> {
        if self.failing {
            return Err(HuginnError::PublishFailed("topic not found".into()));
        }
        let mut published = self.published.lock().unwrap();
        published.push((topic.to_string(), message.to_string()));
        Ok(format!("note-{}", published.len()))
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub const QUEUE_URL: &str = "https://sqs.eu-west-1.amazonaws.com/123456789012/ingest";
pub const TABLE_NAME: &str = "ingest-records";
pub const TOPIC_ARN: &str = "arn:aws:sns:eu-west-1:123456789012:ingest-dlq";

/// Source holding all three destination parameters.
pub fn full_source() -> Arc<ScriptedSource> {
    Arc::new(
        ScriptedSource::new()
            .with("sqs_url", QUEUE_URL)
            .with("dynamodb_table_name", TABLE_NAME)
            .with("dlq_topic_arn", TOPIC_ARN),
    )
}

/// Everything a pipeline test needs to inspect afterwards.
pub struct Harness {
    pub ctx: Arc<PipelineContext>,
    pub source: Arc<ScriptedSource>,
    pub queue: Arc<RecordingQueue>,
    pub store: Arc<RecordingStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub env: Arc<MapEnv>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(
            full_source(),
            RecordingQueue::new(),
            RecordingStore::new(),
            RecordingNotifier::new(),
        )
    }

    pub fn with(
        source: Arc<ScriptedSource>,
        queue: RecordingQueue,
        store: RecordingStore,
        notifier: RecordingNotifier,
    ) -> Self {
        let queue = Arc::new(queue);
        let store = Arc::new(store);
        let notifier = Arc::new(notifier);
        let env = Arc::new(MapEnv::new());
        let ctx = PipelineContext::builder()
            .parameter_source(source.clone())
            .queue(queue.clone())
            .record_store(store.clone())
            .notifier(notifier.clone())
            .environment(env.clone())
            .build()
            .expect("context builds");
        Self {
            ctx: Arc::new(ctx),
            source,
            queue,
            store,
            notifier,
            env,
        }
    }
}

/// A well-formed queued login message.
pub fn login_delivery(id: &str, name: &str) -> huginn::QueueMessage {
    huginn::QueueMessage::new(
        id,
        "aws:sqs",
        format!(r#"{{"type":"login","value":"{name}"}}"#),
    )
}
