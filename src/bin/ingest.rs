//! huginn-ingest: API Gateway front door.
//!
//! Validates `{"name": ...}` requests and enqueues a `login` message.
//! Rejections are returned as 400 responses (with CORS headers) rather than
//! invocation errors, so the caller always sees them.

use std::sync::Arc;

use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::{error, info};

use huginn::lambda::{self, Stage};
use huginn::{IngestHandler, PipelineContext};

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda::init_tracing();
    info!(version = %huginn::version_string(), "huginn-ingest starting");

    let ctx = lambda::build_context(Stage::Ingest).await?;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiGatewayProxyRequest>| {
        let ctx = Arc::clone(&ctx);
        async move { handle(ctx, event).await }
    }))
    .await
}

async fn handle(
    ctx: Arc<PipelineContext>,
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let body = event.payload.body.unwrap_or_default();
    let outcome = IngestHandler::new(ctx).handle(&body).await;

    if let Some(e) = &outcome.error {
        error!(request_id = %event.context.request_id, error = %e, "request rejected");
    }
    Ok(lambda::api_response(&outcome))
}
