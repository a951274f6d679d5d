//! huginn-consumer: stores queued messages in the record table.
//!
//! A failed batch is returned as an invocation error so SQS redelivers it
//! and, once redeliveries are exhausted, moves it to the dead-letter queue.

use std::sync::Arc;

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;

use huginn::lambda::{self, Stage};
use huginn::{PipelineContext, QueueConsumer};

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda::init_tracing();
    info!(version = %huginn::version_string(), "huginn-consumer starting");

    let ctx = lambda::build_context(Stage::Consumer).await?;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let ctx = Arc::clone(&ctx);
        async move { handle(ctx, event).await }
    }))
    .await
}

async fn handle(ctx: Arc<PipelineContext>, event: LambdaEvent<SqsEvent>) -> Result<(), Error> {
    let messages = lambda::queue_messages(event.payload);
    let report = QueueConsumer::new(ctx).process_batch(&messages).await?;
    info!(processed = report.processed, "batch complete");
    Ok(())
}
