//! AWS implementations of the collaborator traits.
//!
//! | Trait | Service | Call |
//! |-------|---------|------|
//! | [`ParameterSource`] | SSM Parameter Store | `GetParameter` |
//! | [`MessageQueue`] | SQS | `SendMessage` |
//! | [`RecordStore`] | DynamoDB | `PutItem` |
//! | [`Notifier`] | SNS | `Publish` |
//!
//! All clients are built from one shared [`SdkConfig`] loaded by
//! [`load_sdk_config`], so region, credentials and the endpoint override
//! are resolved once per process.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use super::traits::{MessageQueue, Notifier, ParameterSource, RecordStore};
use crate::config::AwsSettings;
use crate::types::{Parameter, StoredRecord};
use crate::{HuginnError, Result};

/// Load the shared SDK configuration, applying region and endpoint overrides.
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &settings.region {
        loader = loader.region(aws_sdk_ssm::config::Region::new(region.clone()));
    }
    if let Some(endpoint) = &settings.endpoint_url {
        loader = loader.endpoint_url(endpoint.clone());
    }
    loader.load().await
}

// ============================================================================
// SSM Parameter Store
// ============================================================================

/// [`ParameterSource`] backed by SSM Parameter Store.
#[derive(Debug, Clone)]
pub struct SsmParameterSource {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterSource {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(aws_sdk_ssm::Client::new(sdk_config))
    }

    /// Create from a pre-built client.
    pub fn from_client(client: aws_sdk_ssm::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterSource for SsmParameterSource {
    fn name(&self) -> &str {
        "ssm"
    }

    async fn fetch(&self, name: &str) -> Result<Parameter> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(|se| se.is_parameter_not_found())
                {
                    HuginnError::ParameterNotFound(name.to_string())
                } else {
                    HuginnError::RemoteUnavailable {
                        name: name.to_string(),
                        message: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        let parameter = output
            .parameter()
            .ok_or_else(|| HuginnError::ParameterNotFound(name.to_string()))?;
        let value = parameter
            .value()
            .ok_or_else(|| HuginnError::ParameterNotFound(name.to_string()))?;

        debug!(parameter = name, version = parameter.version(), "fetched parameter from ssm");
        Ok(Parameter::new(name, value).with_version(parameter.version()))
    }
}

// ============================================================================
// SQS
// ============================================================================

/// [`MessageQueue`] backed by SQS.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: aws_sdk_sqs::Client,
}

impl SqsQueue {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(aws_sdk_sqs::Client::new(sdk_config))
    }

    /// Create from a pre-built client.
    pub fn from_client(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    fn name(&self) -> &str {
        "sqs"
    }

    async fn send(&self, queue_url: &str, body: &str, delay_seconds: i32) -> Result<String> {
        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .delay_seconds(delay_seconds)
            .send()
            .await
            .map_err(|e| {
                HuginnError::PublishFailed(aws_sdk_sqs::error::DisplayErrorContext(&e).to_string())
            })?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}

// ============================================================================
// DynamoDB
// ============================================================================

/// [`RecordStore`] backed by DynamoDB.
#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    client: aws_sdk_dynamodb::Client,
}

impl DynamoRecordStore {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(aws_sdk_dynamodb::Client::new(sdk_config))
    }

    /// Create from a pre-built client.
    pub fn from_client(client: aws_sdk_dynamodb::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    fn name(&self) -> &str {
        "dynamodb"
    }

    async fn put(&self, table: &str, record: &StoredRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .item("pkey", AttributeValue::S(record.pkey.clone()))
            .item("skey", AttributeValue::S(record.skey.clone()))
            .item("messageId", AttributeValue::S(record.message_id.clone()))
            .item("eventSource", AttributeValue::S(record.event_source.clone()))
            .item("body", AttributeValue::S(record.body.clone()))
            .send()
            .await
            .map_err(|e| {
                HuginnError::StoreWriteFailed(
                    aws_sdk_dynamodb::error::DisplayErrorContext(&e).to_string(),
                )
            })?;
        Ok(())
    }
}

// ============================================================================
// SNS
// ============================================================================

/// [`Notifier`] backed by SNS.
#[derive(Debug, Clone)]
pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
}

impl SnsNotifier {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_client(aws_sdk_sns::Client::new(sdk_config))
    }

    /// Create from a pre-built client.
    pub fn from_client(client: aws_sdk_sns::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    fn name(&self) -> &str {
        "sns"
    }

    async fn publish(&self, topic: &str, message: &str) -> Result<String> {
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(message)
            .send()
            .await
            .map_err(|e| {
                HuginnError::PublishFailed(aws_sdk_sns::error::DisplayErrorContext(&e).to_string())
            })?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }
}
