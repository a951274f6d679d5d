//! Telemetry metric name constants.
//!
//! Centralised metric names for huginn operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd, CloudWatch EMF); without
//! a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `parameter`: logical parameter name (e.g. "sqs_url")
//! - `status`: outcome: "ok" or "error"
//! - `stage`: pipeline stage: "ingest", "consumer" or "dlq"

/// Parameter lookups served from the local cache.
///
/// Labels: `parameter`.
pub const CACHE_HITS_TOTAL: &str = "huginn_cache_hits_total";

/// Parameter lookups that went to the remote store.
///
/// Labels: `parameter`.
pub const CACHE_MISSES_TOTAL: &str = "huginn_cache_misses_total";

/// Remote parameter fetches.
///
/// Labels: `parameter`, `status` ("ok" | "error").
pub const PARAMETER_FETCHES_TOTAL: &str = "huginn_parameter_fetches_total";

/// Messages accepted by the queue.
pub const MESSAGES_PUBLISHED_TOTAL: &str = "huginn_messages_published_total";

/// Records written to the durable store.
pub const RECORDS_WRITTEN_TOTAL: &str = "huginn_records_written_total";

/// Dead-letter notifications published.
pub const NOTIFICATIONS_PUBLISHED_TOTAL: &str = "huginn_notifications_published_total";

/// Invocations that ended in an error.
///
/// Labels: `stage`.
pub const FAILURES_TOTAL: &str = "huginn_failures_total";
