//! # AWS SQS Adapter
//!
//! A thin asynchronous adapter over AWS SQS exposing three single-request
//! operations (send, next, delete) and the conversion between flat
//! string-to-string attribute maps and SQS message attributes.
//!
//! ## Features
//!
//! - One remote call per operation, no hidden retries or polling
//! - `next` reports an empty queue as `Ok(None)`, not as an error
//! - Failures keep the SDK error as their source, with error code and HTTP status
//! - Attribute values are checked to be strings before anything is sent
//! - The queue service is injected, so it can be replaced in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rs_sqs_adapter::{AttributeMap, QueueClient, client::create_sqs_client_from_env};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let queue = QueueClient::new(create_sqs_client_from_env().await);
//!     let queue_url = "https://sqs.region.amazonaws.com/account/queue-name";
//!
//!     let attributes: AttributeMap = [("color", "red")].into_iter().collect();
//!     queue.send(queue_url, "hello", &attributes).await?;
//!
//!     if let Some(message) = queue.next(queue_url).await? {
//!         println!("Processing message: {}", message.body);
//!         queue.delete(queue_url, &message.receipt_handle).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod attributes;
pub mod client;
pub mod errors;
pub mod queue;

pub use attributes::{AttributeMap, WireAttribute, WireAttributeList, decode, encode};
pub use errors::{Operation, QueueError, QueueResult, ServiceError};
pub use queue::{Message, QueueClient, QueueService, RawMessage, ReceiveRequest, SendReceipt};
