//! Huginn error types

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Input errors
    /// Malformed or missing request field. Terminal, reported to the caller.
    #[error("{0}")]
    Validation(String),

    /// Queued message body could not be decoded.
    #[error("decode failed for message {message_id}: {source}")]
    DecodeFailed {
        message_id: String,
        #[source]
        source: serde_json::Error,
    },

    // Remote configuration errors
    #[error("parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("parameter store unavailable for '{name}': {message}")]
    RemoteUnavailable { name: String, message: String },

    /// A destination address could not be resolved through the parameter cache.
    #[error("unable to resolve '{name}': {source}")]
    ConfigUnresolved {
        name: String,
        #[source]
        source: Box<HuginnError>,
    },

    // Downstream service errors
    #[error("publish failed: {0}")]
    PublishFailed(String),

    #[error("store write failed: {0}")]
    StoreWriteFailed(String),

    /// Batch failed on purpose via the `ALWAYS_ERROR` override.
    #[error("ALWAYS_ERROR = true")]
    ForcedFailure,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Wiring errors
    /// A stage ran without the collaborator it needs.
    #[error("no {0} configured")]
    NotConfigured(&'static str),
}

impl HuginnError {
    /// Whether redelivering the same input could plausibly succeed.
    ///
    /// Remote outages and downstream rejections are transient; malformed
    /// input, missing parameters and missing wiring are not. The pipeline
    /// never retries on its own, this only informs logging and the
    /// invoking infrastructure.
    pub fn is_transient(&self) -> bool {
        match self {
            HuginnError::RemoteUnavailable { .. }
            | HuginnError::PublishFailed(_)
            | HuginnError::StoreWriteFailed(_)
            | HuginnError::ForcedFailure => true,
            HuginnError::ConfigUnresolved { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Shorthand for a [`HuginnError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        HuginnError::Validation(message.into())
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
