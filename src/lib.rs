//! Huginn - event-driven ingestion pipeline with a TTL-cached parameter store
//!
//! Three stages share one [`PipelineContext`]:
//!
//! - [`IngestHandler`] validates a `{"name": ...}` request and enqueues a
//!   normalized [`Message`] through [`MessagePublisher`].
//! - [`QueueConsumer`] writes each queued message as a [`StoredRecord`],
//!   failing the batch at the first bad message.
//! - [`FailureNotifier`] publishes one notification per message the queue
//!   gave up on.
//!
//! Every destination address (queue URL, table name, topic ARN) is looked
//! up by name in a remote parameter store through the [`ParameterCache`],
//! whose behaviour operators can change at runtime with the `USE_SSM_CACHE`
//! and `SSM_CACHE_TIMEOUT` environment variables.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use huginn::{IngestHandler, PipelineContext};
//! use huginn::providers::aws::{SqsQueue, SsmParameterSource, load_sdk_config};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let sdk_config = load_sdk_config(&Default::default()).await;
//!     let ctx = Arc::new(
//!         PipelineContext::builder()
//!             .parameter_source(Arc::new(SsmParameterSource::new(&sdk_config)))
//!             .queue(Arc::new(SqsQueue::new(&sdk_config)))
//!             .build()?,
//!     );
//!
//!     let response = IngestHandler::new(ctx).handle(r#"{"name":"Ada"}"#).await;
//!     println!("{} {}", response.status_code, response.body);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod env;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod pipeline;
pub mod providers;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, CachedParameter, ParameterCache};
pub use config::{AwsSettings, ParameterNames};
pub use error::{HuginnError, Result};
pub use pipeline::{
    BatchReport, FailureNotifier, IngestHandler, IngestResponse, MessagePublisher,
    PipelineBuilder, PipelineContext, QueueConsumer,
};
pub use types::{Message, Parameter, QueueMessage, SortKeyClock, StoredRecord};
pub use version::{BuildInfo, PKG_VERSION, version_string};
