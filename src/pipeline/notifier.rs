//! Dead-letter consumer: turns failed messages into notifications.

use std::sync::Arc;

use tracing::{error, info, instrument};

use super::{BatchReport, PipelineContext};
use crate::Result;
use crate::telemetry;
use crate::types::QueueMessage;

/// Fixed notification text published for every dead-lettered message.
pub const DLQ_NOTIFICATION: &str = "DLQ notification";

/// Publishes one notification per message that exhausted its queue
/// redeliveries.
///
/// The notification is content-agnostic: the message is decoded only to
/// check it is well-formed, and [`DLQ_NOTIFICATION`] is published as-is.
///
/// Unlike [`QueueConsumer`](super::QueueConsumer), the topic address is
/// resolved inside the loop, once per message. With the cache on, all but
/// the first lookup of a batch are normally hits.
#[derive(Debug, Clone)]
pub struct FailureNotifier {
    ctx: Arc<PipelineContext>,
}

impl FailureNotifier {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self { ctx }
    }

    /// Process one dead-letter batch, stopping at the first decode, lookup
    /// or publish failure.
    #[instrument(skip_all, fields(batch_size = messages.len()))]
    pub async fn process_batch(&self, messages: &[QueueMessage]) -> Result<BatchReport> {
        let result = self.run(messages).await;
        if let Err(e) = &result {
            error!(error = %e, transient = e.is_transient(), "dead-letter batch failed");
            metrics::counter!(telemetry::FAILURES_TOTAL, "stage" => "dlq").increment(1);
        }
        result
    }

    async fn run(&self, messages: &[QueueMessage]) -> Result<BatchReport> {
        let notifier = self.ctx.notifier()?;

        let mut report = BatchReport::default();
        for delivery in messages {
            info!(
                message_id = %delivery.message_id,
                event_source = %delivery.event_source,
                body = %delivery.body,
                "dead-lettered message"
            );

            delivery.decode()?;
            let topic = self
                .ctx
                .resolve_address(&self.ctx.names().dlq_topic_arn)
                .await?;
            let notification_id = notifier.publish(&topic, DLQ_NOTIFICATION).await?;

            metrics::counter!(telemetry::NOTIFICATIONS_PUBLISHED_TOTAL).increment(1);
            info!(notification_id = %notification_id, topic = %topic, "dead-letter notification published");
            report.record(notification_id);
        }

        Ok(report)
    }
}
