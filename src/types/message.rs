//! Message types carried through the queue

use serde::{Deserialize, Serialize};

use crate::{HuginnError, Result};

/// Message type emitted by the ingest stage.
pub const LOGIN_MESSAGE_TYPE: &str = "login";

/// The normalized unit carried opaquely through the queue.
///
/// Serialized as `{"type": ..., "value": ...}`. Absent fields decode as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub value: String,
}

impl Message {
    /// Create a message of arbitrary type.
    pub fn new(message_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            value: value.into(),
        }
    }

    /// Create a `login` message for the given name.
    pub fn login(name: impl Into<String>) -> Self {
        Self::new(LOGIN_MESSAGE_TYPE, name)
    }

    /// JSON body as submitted to the queue.
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Partition key of the record this message is stored under: `type#value`.
    pub fn partition_key(&self) -> String {
        format!("{}#{}", self.message_type, self.value)
    }
}

/// A message as delivered by the queue to a consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    /// Queue-assigned delivery identifier.
    pub message_id: String,
    /// Origin of the delivery (e.g. `aws:sqs`).
    pub event_source: String,
    /// Raw message text, expected to be a JSON [`Message`].
    pub body: String,
}

impl QueueMessage {
    pub fn new(
        message_id: impl Into<String>,
        event_source: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            event_source: event_source.into(),
            body: body.into(),
        }
    }

    /// Decode the body as a [`Message`].
    ///
    /// The body must be a JSON object whose `type` and `value`, when
    /// present, are strings, or `null` (an empty message); anything else is
    /// [`HuginnError::DecodeFailed`].
    pub fn decode(&self) -> Result<Message> {
        serde_json::from_str::<Option<Message>>(&self.body)
            .map(Option::unwrap_or_default)
            .map_err(|source| HuginnError::DecodeFailed {
                message_id: self.message_id.clone(),
                source,
            })
    }
}
