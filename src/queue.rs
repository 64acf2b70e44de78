use serde_json::Value;

use crate::attributes::{self, AttributeMap};
use crate::errors::{Operation, QueueError, QueueResult};

mod service;

pub use service::{QueueService, RawMessage, ReceiveRequest, SendReceipt};

/// A message received from a queue.
///
/// The caller deletes it with [`QueueClient::delete`] once it has been
/// processed, using `receipt_handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub receipt_handle: String,
    pub message_id: String,
    pub body: String,
    /// Custom message attributes.
    pub attributes: AttributeMap,
    /// Attributes maintained by SQS, such as `ApproximateReceiveCount`.
    pub system_attributes: AttributeMap,
}

/// Send, receive and delete messages through a [`QueueService`].
///
/// Every operation issues exactly one request and returns its outcome.
/// There are no retries and no polling; callers decide what to do with
/// failures.
#[derive(Debug, Clone)]
pub struct QueueClient<S = aws_sdk_sqs::Client>
where
    S: QueueService,
{
    /// The queue service used to issue requests.
    service: S,
}

impl QueueClient<aws_sdk_sqs::Client> {
    /// Creates a client backed by an SQS client configured from the
    /// environment.
    pub async fn from_env() -> Self {
        QueueClient::new(crate::client::create_sqs_client_from_env().await)
    }
}

impl<S> QueueClient<S>
where
    S: QueueService,
{
    pub fn new(service: S) -> Self {
        QueueClient { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Sends `body` with the given attributes to the queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Transport`] if the request fails.
    #[tracing::instrument(skip(self, body, attributes), fields(attribute_count = attributes.len()))]
    pub async fn send(
        &self,
        queue_url: &str,
        body: &str,
        attributes: &AttributeMap,
    ) -> QueueResult<SendReceipt> {
        let receipt = self
            .service
            .publish(queue_url, body, attributes::encode(attributes))
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to send message");
                QueueError::transport(Operation::Send, err)
            })?;

        tracing::debug!(message_id = ?receipt.message_id, "message sent");
        Ok(receipt)
    }

    /// Sends `body` with attributes given as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidAttribute`] without sending anything if
    /// an attribute value is not a string, or [`QueueError::Transport`] if
    /// the request fails.
    pub async fn send_json(
        &self,
        queue_url: &str,
        body: &str,
        attributes: Value,
    ) -> QueueResult<SendReceipt> {
        let attributes = AttributeMap::try_from(attributes)?;
        self.send(queue_url, body, &attributes).await
    }

    /// Receives the next available message, if any.
    ///
    /// Returns `Ok(None)` when the queue has no message to deliver.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Transport`] if the request fails, or
    /// [`QueueError::MalformedResponse`] if the delivered message lacks a
    /// receipt handle or message id.
    #[tracing::instrument(skip(self))]
    pub async fn next(&self, queue_url: &str) -> QueueResult<Option<Message>> {
        let request = ReceiveRequest {
            queue_url: queue_url.to_string(),
            max_messages: 1,
            include_all_attributes: true,
        };

        let messages = self.service.receive(&request).await.map_err(|err| {
            tracing::error!(error = %err, "failed to receive message");
            QueueError::transport(Operation::Receive, err)
        })?;

        let Some(raw) = messages.into_iter().next() else {
            tracing::debug!("queue is empty");
            return Ok(None);
        };

        let message = normalize(raw)?;
        tracing::debug!(
            message_id = %message.message_id,
            attribute_count = message.attributes.len(),
            "message received"
        );
        Ok(Some(message))
    }

    /// Deletes a received message.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Transport`] if the request fails, including when
    /// the receipt handle has already been used or has expired.
    #[tracing::instrument(skip(self, receipt_handle))]
    pub async fn delete(&self, queue_url: &str, receipt_handle: &str) -> QueueResult<()> {
        self.service
            .acknowledge(queue_url, receipt_handle)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to delete message");
                QueueError::transport(Operation::Delete, err)
            })?;

        tracing::debug!("message deleted");
        Ok(())
    }
}

fn normalize(raw: RawMessage) -> QueueResult<Message> {
    let receipt_handle = raw.receipt_handle.ok_or(QueueError::MalformedResponse {
        operation: Operation::Receive,
        field: "ReceiptHandle",
    })?;
    let message_id = raw.message_id.ok_or(QueueError::MalformedResponse {
        operation: Operation::Receive,
        field: "MessageId",
    })?;

    Ok(Message {
        receipt_handle,
        message_id,
        body: raw.body.unwrap_or_default(),
        attributes: attributes::decode(&raw.attributes),
        system_attributes: raw.system_attributes.into(),
    })
}
