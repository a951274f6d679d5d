//! Durable record written by the queue consumer

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::message::{Message, QueueMessage};

/// Durable projection of a consumed message.
///
/// Serialized with the store's attribute names: `pkey`, `skey`,
/// `messageId`, `eventSource`, `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Partition key, `type#value`.
    pub pkey: String,
    /// Sort key, the ingestion timestamp (RFC3339, nanoseconds, UTC).
    pub skey: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(rename = "eventSource")]
    pub event_source: String,
    /// Raw original message text.
    pub body: String,
}

impl StoredRecord {
    /// Build the record for `delivery`, whose body decoded to `message`.
    pub fn new(message: &Message, delivery: &QueueMessage, sort_key: String) -> Self {
        Self {
            pkey: message.partition_key(),
            skey: sort_key,
            message_id: delivery.message_id.clone(),
            event_source: delivery.event_source.clone(),
            body: delivery.body.clone(),
        }
    }
}

/// Issues sort keys from the wall clock.
///
/// Keys are RFC3339 timestamps with exactly nine fractional digits and a
/// `Z` suffix, so lexical order is chronological order. Within one clock
/// they are strictly increasing: when the wall clock has not advanced past
/// the last issued instant (coarse clock, rapid writes, clock stepping
/// backwards) the key is bumped one nanosecond past the previous one.
#[derive(Debug, Default)]
pub struct SortKeyClock {
    last_nanos: AtomicI64,
}

impl SortKeyClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sort key, strictly greater than every key issued before.
    pub fn next_key(&self) -> String {
        let now = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        self.key_at(now)
    }

    /// Sort key for wall-clock instant `now_nanos` (nanoseconds since epoch).
    pub(crate) fn key_at(&self, now_nanos: i64) -> String {
        let mut last = self.last_nanos.load(Ordering::Relaxed);
        let issued = loop {
            let candidate = now_nanos.max(last.saturating_add(1));
            match self.last_nanos.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break candidate,
                Err(actual) => last = actual,
            }
        };
        format_nanos(issued)
    }
}

fn format_nanos(nanos: i64) -> String {
    Utc.timestamp_nanos(nanos)
        .to_rfc3339_opts(SecondsFormat::Nanos, true)
}
