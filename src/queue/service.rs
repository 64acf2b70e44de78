use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_sqs::types::{MessageAttributeValue, MessageSystemAttributeName};

use crate::attributes::{WireAttribute, WireAttributeList};
use crate::errors::ServiceError;

/// Receive all custom message attributes.
const ALL_ATTRIBUTES: &str = "All";

/// Acknowledgment returned by the service for a sent message.
///
/// Fields are passed through exactly as SQS returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: Option<String>,
    /// Only set for FIFO queues.
    pub sequence_number: Option<String>,
    pub md5_of_message_body: Option<String>,
    pub md5_of_message_attributes: Option<String>,
}

/// Parameters of a single receive request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveRequest {
    pub queue_url: String,
    pub max_messages: i32,
    /// Ask for every system and custom attribute.
    ///
    /// [`crate::queue::QueueClient::next`] always sets this; it is left
    /// configurable for callers driving a [`QueueService`] directly.
    pub include_all_attributes: bool,
}

/// A message as delivered by the service, before it is normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub receipt_handle: Option<String>,
    pub message_id: Option<String>,
    pub body: Option<String>,
    pub attributes: WireAttributeList,
    pub system_attributes: HashMap<String, String>,
}

/// The queue service operations the adapter depends on.
///
/// Implemented for [`aws_sdk_sqs::Client`]. Each call is a single remote
/// request; implementations must be safe to call concurrently.
#[async_trait]
pub trait QueueService: Send + Sync {
    /// Sends one message.
    async fn publish(
        &self,
        queue_url: &str,
        body: &str,
        attributes: WireAttributeList,
    ) -> Result<SendReceipt, ServiceError>;

    /// Retrieves up to `request.max_messages` messages.
    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<RawMessage>, ServiceError>;

    /// Removes a delivered message so it is not redelivered.
    async fn acknowledge(&self, queue_url: &str, receipt_handle: &str)
    -> Result<(), ServiceError>;
}

#[async_trait]
impl QueueService for aws_sdk_sqs::Client {
    async fn publish(
        &self,
        queue_url: &str,
        body: &str,
        attributes: WireAttributeList,
    ) -> Result<SendReceipt, ServiceError> {
        let mut request = self.send_message().queue_url(queue_url).message_body(body);

        for (name, attr) in attributes {
            let value = MessageAttributeValue::builder()
                .data_type(attr.data_type)
                .string_value(attr.string_value)
                .build()
                .map_err(ServiceError::new)?;
            request = request.message_attributes(name, value);
        }

        let output = request.send().await?;

        Ok(SendReceipt {
            message_id: output.message_id().map(str::to_string),
            sequence_number: output.sequence_number().map(str::to_string),
            md5_of_message_body: output.md5_of_message_body().map(str::to_string),
            md5_of_message_attributes: output.md5_of_message_attributes().map(str::to_string),
        })
    }

    async fn receive(&self, request: &ReceiveRequest) -> Result<Vec<RawMessage>, ServiceError> {
        let mut call = self
            .receive_message()
            .queue_url(&request.queue_url)
            .max_number_of_messages(request.max_messages);

        if request.include_all_attributes {
            call = call
                .message_system_attribute_names(MessageSystemAttributeName::All)
                .message_attribute_names(ALL_ATTRIBUTES);
        }

        let output = call.send().await?;

        Ok(output.messages().iter().map(raw_message).collect())
    }

    async fn acknowledge(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), ServiceError> {
        self.delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}

fn raw_message(message: &aws_sdk_sqs::types::Message) -> RawMessage {
    let attributes: WireAttributeList = message
        .message_attributes()
        .map(|attrs| {
            attrs
                .iter()
                .filter_map(|(name, value)| match value.string_value() {
                    Some(string_value) => Some((
                        name.clone(),
                        WireAttribute {
                            data_type: value.data_type().to_string(),
                            string_value: string_value.to_string(),
                        },
                    )),
                    None => {
                        tracing::warn!(
                            attribute = %name,
                            data_type = value.data_type(),
                            "skipping message attribute without a string value"
                        );
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    let system_attributes: HashMap<String, String> = message
        .attributes()
        .map(|attrs| {
            attrs
                .iter()
                .map(|(name, value)| (name.as_str().to_string(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    RawMessage {
        receipt_handle: message.receipt_handle().map(str::to_string),
        message_id: message.message_id().map(str::to_string),
        body: message.body().map(str::to_string),
        attributes,
        system_attributes,
    }
}
