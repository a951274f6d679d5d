//! Pipeline configuration.
//!
//! Destination addresses are never configured here directly; they live in
//! the remote parameter store and are looked up by the logical names in
//! [`ParameterNames`]. What this module holds is the wiring around them:
//! the names themselves, the environment variables operators use to steer
//! a running deployment, and the AWS client settings.

use crate::env::EnvSource;

/// Enables (`true`/`TRUE`) or disables the parameter cache.
pub const USE_CACHE_VAR: &str = "USE_SSM_CACHE";

/// Parameter cache TTL in whole seconds. Invalid or negative values are ignored.
pub const CACHE_TIMEOUT_VAR: &str = "SSM_CACHE_TIMEOUT";

/// Forces the queue consumer to fail every batch (`true`/`TRUE`).
pub const ALWAYS_ERROR_VAR: &str = "ALWAYS_ERROR";

/// AWS region for the SDK clients.
pub const REGION_VAR: &str = "AWS_REGION";

/// Endpoint override for the SDK clients (e.g. LocalStack).
pub const ENDPOINT_URL_VAR: &str = "AWS_ENDPOINT_URL";

/// Logical names of the parameters holding each destination address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNames {
    /// Queue URL the ingest stage publishes to. Default: `sqs_url`.
    pub queue_url: String,
    /// Table the consumer writes records to. Default: `dynamodb_table_name`.
    pub table_name: String,
    /// Topic the dead-letter stage notifies. Default: `dlq_topic_arn`.
    pub dlq_topic_arn: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            queue_url: "sqs_url".to_string(),
            table_name: "dynamodb_table_name".to_string(),
            dlq_topic_arn: "dlq_topic_arn".to_string(),
        }
    }
}

impl ParameterNames {
    /// Create the default set of names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the queue URL parameter name.
    pub fn queue_url(mut self, name: impl Into<String>) -> Self {
        self.queue_url = name.into();
        self
    }

    /// Override the table name parameter name.
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Override the dead-letter topic parameter name.
    pub fn dlq_topic_arn(mut self, name: impl Into<String>) -> Self {
        self.dlq_topic_arn = name.into();
        self
    }
}

/// Settings for the AWS SDK clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    /// Region override; the SDK default chain applies when `None`.
    pub region: Option<String>,
    /// Endpoint override shared by every client.
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Read [`REGION_VAR`] and [`ENDPOINT_URL_VAR`]. Empty values count as unset.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let non_empty = |key: &str| env.var(key).filter(|v| !v.trim().is_empty());
        Self {
            region: non_empty(REGION_VAR),
            endpoint_url: non_empty(ENDPOINT_URL_VAR),
        }
    }
}
