//! Message queue trait.

use as_error::Result;
use as_types::{ReceiveOptions, ReceivedMessage};
use async_trait::async_trait;

/// Trait for message queue backends.
///
/// Implementations include:
/// - AWS SQS (`as_sqs::SqsQueue`)
/// - In-memory queue (`as_sqs::MemoryQueue`, for testing/development)
///
/// # Message Flow
///
/// 1. Producers resolve a queue with [`queue_url`](MessageQueue::queue_url)
///    and call [`send`](MessageQueue::send)
/// 2. Consumers call [`receive_one`](MessageQueue::receive_one)
/// 3. Consumers call [`delete`](MessageQueue::delete) with the receipt handle
///    to acknowledge the delivery
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Resolves a queue name to its URL.
    ///
    /// A missing queue must be reported as `QueueError::QueueDoesNotExist`.
    async fn queue_url(&self, queue_name: &str) -> Result<String>;

    /// Sends a message body and returns the assigned message id.
    async fn send(&self, queue_url: &str, body: &str) -> Result<String>;

    /// Receives at most one message.
    ///
    /// Returns `Ok(None)` if the queue has no visible messages.
    async fn receive_one(
        &self,
        queue_url: &str,
        options: &ReceiveOptions,
    ) -> Result<Option<ReceivedMessage>>;

    /// Deletes a delivered message by its receipt handle.
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()>;
}
