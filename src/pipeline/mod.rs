//! The three pipeline stages and the context they share.
//!
//! ```text
//! request ─▶ IngestHandler ─▶ MessagePublisher ─▶ queue
//!                                                   │
//!                      record store ◀─ QueueConsumer ◀┘
//!                                                   │ (redeliveries exhausted)
//!                    notification topic ◀─ FailureNotifier
//! ```
//!
//! Every stage resolves its destination through the shared
//! [`PipelineContext`] and its parameter cache.

mod consumer;
mod context;
mod ingest;
mod notifier;
mod publisher;

pub use consumer::QueueConsumer;
pub use context::{PipelineBuilder, PipelineContext};
pub use ingest::{IngestHandler, IngestResponse, NAME_NOT_SPECIFIED, UNMARSHAL_ERROR};
pub use notifier::{DLQ_NOTIFICATION, FailureNotifier};
pub use publisher::MessagePublisher;

/// Summary of a successfully processed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of messages fully processed.
    pub processed: usize,
    /// One id per processed message: the delivery id of each stored
    /// message, or the id of each published notification.
    pub ids: Vec<String>,
}

impl BatchReport {
    fn record(&mut self, id: String) {
        self.processed += 1;
        self.ids.push(id);
    }
}
