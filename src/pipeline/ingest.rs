//! Validating front door of the pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::{MessagePublisher, PipelineContext};
use crate::telemetry;
use crate::types::Message;
use crate::{HuginnError, Result};

/// Error reported when the request body is not a JSON `{"name": ...}` object.
pub const UNMARSHAL_ERROR: &str = "Unmarshal error";

/// Error reported when the request carries no name.
pub const NAME_NOT_SPECIFIED: &str = "Name not specified";

#[derive(Debug, Deserialize)]
struct IngestRequest {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct IngestReply<'a> {
    result: &'a str,
    sqs: &'a str,
}

/// Outcome of [`IngestHandler::handle`].
///
/// Always a complete response for the caller. On failure `error` also
/// carries the underlying error for host-level logging.
#[derive(Debug)]
pub struct IngestResponse {
    pub status_code: u16,
    pub body: String,
    pub error: Option<HuginnError>,
}

impl IngestResponse {
    fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            body,
            error: None,
        }
    }

    /// 400 response for `error`. Validation failures get an empty body;
    /// downstream failures carry their description.
    fn rejected(error: HuginnError) -> Self {
        let body = match &error {
            HuginnError::Validation(_) => String::new(),
            other => other.to_string(),
        };
        Self {
            status_code: 400,
            body,
            error: Some(error),
        }
    }

    /// Whether the request was accepted.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Accepts `{"name": ...}` requests and enqueues a `login` message.
///
/// Performs no durable writes itself; transport concerns such as CORS
/// headers belong to whoever serves the response.
#[derive(Debug, Clone)]
pub struct IngestHandler {
    publisher: MessagePublisher,
}

impl IngestHandler {
    pub fn new(ctx: Arc<PipelineContext>) -> Self {
        Self {
            publisher: MessagePublisher::new(ctx),
        }
    }

    /// Handle one raw request body.
    ///
    /// - body not `{"name": string}` → 400, `Unmarshal error`
    /// - `null` body, empty or missing name → 400, `Name not specified`
    /// - publish failure → 400, body describes the failure
    /// - success → 200, `{"result":"Hello <name>","sqs":"<delivery id>"}`
    #[instrument(skip_all)]
    pub async fn handle(&self, raw_body: &str) -> IngestResponse {
        match self.accept(raw_body).await {
            Ok(body) => IngestResponse::ok(body),
            Err(e) => {
                warn!(error = %e, "ingest request rejected");
                metrics::counter!(telemetry::FAILURES_TOTAL, "stage" => "ingest").increment(1);
                IngestResponse::rejected(e)
            }
        }
    }

    async fn accept(&self, raw_body: &str) -> Result<String> {
        let request: Option<IngestRequest> = serde_json::from_str(raw_body)
            .map_err(|_| HuginnError::validation(UNMARSHAL_ERROR))?;

        let name = request.and_then(|r| r.name).unwrap_or_default();
        if name.is_empty() {
            return Err(HuginnError::validation(NAME_NOT_SPECIFIED));
        }

        let greeting = format!("Hello {name}");
        let delivery_id = self.publisher.publish(&Message::login(name)).await?;

        Ok(serde_json::to_string(&IngestReply {
            result: &greeting,
            sqs: &delivery_id,
        })?)
    }
}
