//! Lambda runtime glue shared by the `huginn-*` binaries.
//!
//! Converts runtime events into pipeline inputs, builds the AWS-backed
//! [`PipelineContext`] once per cold start, and attaches the CORS headers
//! the ingest endpoint serves with every response.

use std::sync::Arc;

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::ApiGatewayProxyResponse;
use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use http::{HeaderMap, HeaderValue};

use crate::config::AwsSettings;
use crate::env::{EnvSource, ProcessEnv};
use crate::pipeline::{IngestResponse, PipelineContext};
use crate::providers::aws::{
    DynamoRecordStore, SnsNotifier, SqsQueue, SsmParameterSource, load_sdk_config,
};
use crate::types::QueueMessage;
use crate::Result;

/// CORS headers attached to every ingest response.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "OPTIONS,POST"),
    (
        "access-control-allow-headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
];

/// Which collaborators a binary needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Consumer,
    DeadLetter,
}

/// Install the global `tracing` subscriber.
///
/// Filter from `RUST_LOG`, defaulting to `info`. Timestamps are omitted
/// since the Lambda log stream records its own.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();
}

/// Build the AWS-backed context for `stage` from the process environment.
pub async fn build_context(stage: Stage) -> Result<Arc<PipelineContext>> {
    let env: Arc<dyn EnvSource> = Arc::new(ProcessEnv);
    let sdk_config = load_sdk_config(&AwsSettings::from_env(env.as_ref())).await;

    let mut builder = PipelineContext::builder()
        .environment(env)
        .parameter_source(Arc::new(SsmParameterSource::new(&sdk_config)));
    builder = match stage {
        Stage::Ingest => builder.queue(Arc::new(SqsQueue::new(&sdk_config))),
        Stage::Consumer => builder.record_store(Arc::new(DynamoRecordStore::new(&sdk_config))),
        Stage::DeadLetter => builder.notifier(Arc::new(SnsNotifier::new(&sdk_config))),
    };
    Ok(Arc::new(builder.build()?))
}

/// Flatten an SQS event into queue messages, keeping delivery order.
pub fn queue_messages(event: SqsEvent) -> Vec<QueueMessage> {
    event.records.into_iter().map(queue_message).collect()
}

fn queue_message(record: SqsMessage) -> QueueMessage {
    QueueMessage {
        message_id: record.message_id.unwrap_or_default(),
        event_source: record.event_source.unwrap_or_default(),
        body: record.body.unwrap_or_default(),
    }
}

/// Convert an ingest outcome into an API Gateway proxy response with CORS
/// headers.
pub fn api_response(outcome: &IngestResponse) -> ApiGatewayProxyResponse {
    let mut response = ApiGatewayProxyResponse::default();
    response.status_code = i64::from(outcome.status_code);
    response.headers = cors_headers();
    response.body = Some(Body::Text(outcome.body.clone()));
    response
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for &(name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers
}
