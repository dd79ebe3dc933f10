//! Queue send, broadcast and receive operations.

use as_error::Result;
use as_session::ClientRegistry;
use as_traits::MessageQueue;
use as_types::{ReceiveOptions, ReceivedMessage, SentMessage};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, Span, debug, error, info, warn};

use crate::broadcast::{BroadcastFailure, BroadcastReport};
use crate::store::SqsQueue;

/// When [`QueueAccessor::take_message`] deletes the message it received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Delete before returning. A consumer that crashes after `take_message`
    /// returns loses the message.
    #[default]
    AtMostOnce,

    /// Return without deleting. The consumer calls
    /// [`acknowledge`](QueueAccessor::acknowledge) once processing succeeds;
    /// otherwise the message is redelivered after its visibility timeout.
    AtLeastOnce,
}

/// Sends to and receives from queues through one [`MessageQueue`] backend.
///
/// Receives ask for at most one message, with the accessor's
/// [`ReceiveOptions`] (short poll, zero visibility timeout by default).
#[derive(Debug)]
pub struct QueueAccessor<Q> {
    queue: Q,
    options: ReceiveOptions,
    delivery: DeliveryMode,
    span: Span,
}

impl QueueAccessor<SqsQueue> {
    /// Accessor over the registry's shared SQS client.
    pub async fn from_registry(registry: &ClientRegistry) -> Result<Self> {
        Ok(Self::new(SqsQueue::from_registry(registry).await?))
    }
}

impl<Q: MessageQueue> QueueAccessor<Q> {
    /// Create an accessor that logs under the caller's current span.
    pub fn new(queue: Q) -> Self {
        Self {
            queue,
            options: ReceiveOptions::default(),
            delivery: DeliveryMode::default(),
            span: Span::current(),
        }
    }

    /// Set the receive parameters.
    pub fn with_receive_options(mut self, options: ReceiveOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the delivery mode used by `take_message`.
    pub fn with_delivery_mode(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    /// Switch to at-least-once delivery, hiding received messages for
    /// `visibility_timeout` seconds while the caller processes them.
    pub fn at_least_once(self, visibility_timeout: i32) -> Self {
        let options = self.options.with_visibility_timeout(visibility_timeout);
        self.with_delivery_mode(DeliveryMode::AtLeastOnce)
            .with_receive_options(options)
    }

    /// Set the span operations are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The backend.
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// The receive parameters.
    pub fn receive_options(&self) -> ReceiveOptions {
        self.options
    }

    /// The delivery mode used by `take_message`.
    pub fn delivery_mode(&self) -> DeliveryMode {
        self.delivery
    }

    /// Resolve a queue name to its URL.
    pub async fn queue_url(&self, queue_name: &str) -> Result<String> {
        self.queue
            .queue_url(queue_name)
            .instrument(self.span.clone())
            .await
            .inspect_err(|e| {
                error!(parent: &self.span, queue = queue_name, error = %e, "Error resolving queue URL")
            })
    }

    /// Send a message to the queue with the given name.
    ///
    /// The URL is resolved on every call.
    pub async fn send_message(&self, queue_name: &str, body: &str) -> Result<SentMessage> {
        let queue_url = self.queue_url(queue_name).await?;
        self.send_message_to_url(&queue_url, body).await
    }

    /// Send a message to a queue URL.
    pub async fn send_message_to_url(&self, queue_url: &str, body: &str) -> Result<SentMessage> {
        async {
            debug!(queue_url, body, "Sending message");
            match self.queue.send(queue_url, body).await {
                Ok(message_id) => {
                    info!(queue_url, message_id = %message_id, "Message pushed to queue");
                    Ok(SentMessage {
                        queue_url: queue_url.to_string(),
                        message_id,
                    })
                }
                Err(e) => {
                    error!(queue_url, body_len = body.len(), error = %e, "Message not pushed to queue");
                    Err(e)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    /// Send the same body to every queue URL, in order.
    ///
    /// A failed send is logged and recorded; it does not stop the remaining
    /// sends.
    pub async fn send_message_to_queues<I, U>(&self, queue_urls: I, body: &str) -> BroadcastReport
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let mut report = BroadcastReport::default();

        for queue_url in queue_urls {
            let queue_url = queue_url.as_ref();
            match self.send_message_to_url(queue_url, body).await {
                Ok(sent) => report.delivered.push(sent),
                Err(error) => report.failed.push(BroadcastFailure {
                    queue_url: queue_url.to_string(),
                    error,
                }),
            }
        }

        if !report.is_complete() {
            warn!(
                parent: &self.span,
                delivered = report.delivered_count(),
                failed = report.failed_count(),
                "Broadcast partially failed"
            );
        }

        report
    }

    /// Receive at most one message without deleting it.
    ///
    /// `Ok(None)` means the queue had no visible message.
    pub async fn receive_message(&self, queue_url: &str) -> Result<Option<ReceivedMessage>> {
        async {
            let result = self.queue.receive_one(queue_url, &self.options).await;
            match &result {
                Ok(Some(msg)) => info!(queue_url, message_id = %msg.message_id, "Received message"),
                Ok(None) => debug!(queue_url, "No message available"),
                Err(e) => error!(queue_url, error = %e, "Error receiving message"),
            }
            result
        }
        .instrument(self.span.clone())
        .await
    }

    /// Delete a delivered message by its receipt handle.
    pub async fn acknowledge(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        async {
            let result = self.queue.delete(queue_url, receipt_handle).await;
            match &result {
                Ok(()) => debug!(queue_url, "Deleted message"),
                Err(e) => error!(queue_url, error = %e, "Error deleting message"),
            }
            result
        }
        .instrument(self.span.clone())
        .await
    }

    /// Receive at most one message and apply the accessor's [`DeliveryMode`].
    ///
    /// In [`DeliveryMode::AtMostOnce`] the message is deleted before it is
    /// returned; if the delete fails the error is returned instead of the
    /// message, since the queue may deliver it again.
    pub async fn take_message(&self, queue_url: &str) -> Result<Option<ReceivedMessage>> {
        let Some(message) = self.receive_message(queue_url).await? else {
            return Ok(None);
        };

        if self.delivery == DeliveryMode::AtMostOnce {
            self.acknowledge(queue_url, &message.receipt_handle).await?;
        }

        Ok(Some(message))
    }
}
