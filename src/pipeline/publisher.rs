//! Queue publishing for the ingest stage.

use std::sync::Arc;

use tracing::{info, instrument};

use super::PipelineContext;
use crate::Result;
use crate::telemetry;
use crate::types::Message;

/// Publishes normalized messages to the queue named by the `sqs_url`
/// parameter.
#[derive(Debug, Clone)]
pub struct MessagePublisher {
    ctx: Arc<PipelineContext>,
}

impl MessagePublisher {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self { ctx }
    }

    /// Submit `message` with zero delay and return the queue's delivery id.
    ///
    /// The queue address is resolved first; if that fails the queue is not
    /// contacted and the error is `ConfigUnresolved`. Queue rejections are
    /// `PublishFailed`. No retry happens here: once the queue accepts a
    /// message, redelivery is the queue's business.
    #[instrument(skip_all, fields(message_type = %message.message_type))]
    pub async fn publish(&self, message: &Message) -> Result<String> {
        let queue_url = self
            .ctx
            .resolve_address(&self.ctx.names().queue_url)
            .await?;
        let queue = self.ctx.queue()?;
        let body = message.to_body()?;

        let delivery_id = queue.send(&queue_url, &body, 0).await?;

        metrics::counter!(telemetry::MESSAGES_PUBLISHED_TOTAL).increment(1);
        info!(delivery_id = %delivery_id, queue = queue.name(), "message published");
        Ok(delivery_id)
    }
}
