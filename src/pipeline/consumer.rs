//! Queue consumer: persists delivered messages as durable records.

use std::sync::Arc;

use tracing::{error, info, instrument};

use super::{BatchReport, PipelineContext};
use crate::telemetry;
use crate::types::{QueueMessage, StoredRecord};
use crate::{HuginnError, Result};

/// Writes each message of a queue batch to the record store.
///
/// # Batch semantics
///
/// - `ALWAYS_ERROR` is checked before anything else; when on, the batch
///   fails without a lookup or a write.
/// - The table name is resolved once per batch. Failure aborts the batch
///   with nothing written.
/// - Messages are processed in order. The first decode or write failure
///   aborts the batch at that message.
/// - Records written before the failure stay written; there is no
///   rollback. The invoker redelivers the whole batch, so delivery is
///   at-least-once and duplicates of the early records are expected.
#[derive(Debug, Clone)]
pub struct QueueConsumer {
    ctx: Arc<PipelineContext>,
}

impl QueueConsumer {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self { ctx }
    }

    /// Process one batch. See the type docs for failure semantics.
    #[instrument(skip_all, fields(batch_size = messages.len()))]
    pub async fn process_batch(&self, messages: &[QueueMessage]) -> Result<BatchReport> {
        let result = self.run(messages).await;
        if let Err(e) = &result {
            error!(error = %e, transient = e.is_transient(), "queue batch failed");
            metrics::counter!(telemetry::FAILURES_TOTAL, "stage" => "consumer").increment(1);
        }
        result
    }

    async fn run(&self, messages: &[QueueMessage]) -> Result<BatchReport> {
        if self.ctx.always_error() {
            return Err(HuginnError::ForcedFailure);
        }

        let store = self.ctx.record_store()?;
        let table = self
            .ctx
            .resolve_address(&self.ctx.names().table_name)
            .await?;

        let mut report = BatchReport::default();
        for delivery in messages {
            info!(
                message_id = %delivery.message_id,
                event_source = %delivery.event_source,
                body = %delivery.body,
                "consuming message"
            );

            let message = delivery.decode()?;
            let record = StoredRecord::new(&message, delivery, self.ctx.next_sort_key());
            store.put(&table, &record).await?;

            metrics::counter!(telemetry::RECORDS_WRITTEN_TOTAL).increment(1);
            report.record(delivery.message_id.clone());
        }

        info!(processed = report.processed, table = %table, "queue batch stored");
        Ok(report)
    }
}
