//! huginn-dlq: notifies about messages that landed on the dead-letter queue.

use std::sync::Arc;

use aws_lambda_events::event::sqs::SqsEvent;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::info;

use huginn::lambda::{self, Stage};
use huginn::{FailureNotifier, PipelineContext};

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda::init_tracing();
    info!(version = %huginn::version_string(), "huginn-dlq starting");

    let ctx = lambda::build_context(Stage::DeadLetter).await?;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SqsEvent>| {
        let ctx = Arc::clone(&ctx);
        async move { handle(ctx, event).await }
    }))
    .await
}

async fn handle(ctx: Arc<PipelineContext>, event: LambdaEvent<SqsEvent>) -> Result<(), Error> {
    let messages = lambda::queue_messages(event.payload);
    let report = FailureNotifier::new(ctx).process_batch(&messages).await?;
    info!(notified = report.processed, "dead-letter batch complete");
    Ok(())
}
