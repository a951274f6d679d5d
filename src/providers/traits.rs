//! Traits for the remote collaborators the pipeline talks to.
//!
//! Each remote service is a capability-specific trait rather than one
//! client type, so that stages only depend on what they use and tests can
//! substitute scripted implementations:
//!
//! - [`ParameterSource`]: remote configuration store (parameter lookup)
//! - [`MessageQueue`]: queue the ingest stage publishes to
//! - [`RecordStore`]: durable table the consumer writes to
//! - [`Notifier`]: topic the dead-letter stage publishes to
//!
//! # Error conventions
//!
//! Implementations map their failures onto the crate error:
//! - `ParameterSource`: `ParameterNotFound` for unknown names,
//!   `RemoteUnavailable` for everything else
//! - `MessageQueue`, `Notifier`: `PublishFailed`
//! - `RecordStore`: `StoreWriteFailed`
//!
//! None of these retry on their own beyond what the underlying client does.

use async_trait::async_trait;

use crate::Result;
use crate::types::{Parameter, StoredRecord};

/// Fetches named parameters from the remote configuration store.
#[async_trait]
pub trait ParameterSource: Send + Sync {
    /// Source name for logging/debugging.
    fn name(&self) -> &str;

    /// Fetch the current value of `name`.
    async fn fetch(&self, name: &str) -> Result<Parameter>;
}

/// Submits message bodies to a queue.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Queue backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Send `body` to the queue at `queue_url`, returning the queue-assigned
    /// message id.
    async fn send(&self, queue_url: &str, body: &str, delay_seconds: i32) -> Result<String>;
}

/// Writes records to durable storage.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Write `record` into `table`. Unconditional put: a record with the same
    /// keys is overwritten.
    async fn put(&self, table: &str, record: &StoredRecord) -> Result<()>;
}

/// Publishes notifications to a topic.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifier backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Publish `message` to `topic`, returning the notification id.
    async fn publish(&self, topic: &str, message: &str) -> Result<String>;
}
