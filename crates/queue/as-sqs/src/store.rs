//! SQS backend for [`MessageQueue`].

use as_error::{QueueError, Result, ServiceFailure, classify_service_failure};
use as_session::ClientRegistry;
use as_traits::MessageQueue;
use as_types::{ReceiveOptions, ReceivedMessage};
use async_trait::async_trait;
use aws_sdk_sqs::Client;
use aws_sdk_sqs::config::http::HttpResponse;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::types::{Message, MessageSystemAttributeName};
use chrono::DateTime;
use std::collections::HashMap;
use tracing::debug;

/// Message attribute name selecting every attribute.
const ALL_MESSAGE_ATTRIBUTES: &str = "All";

/// Message queue backed by an SQS client.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: Client,
}

impl SqsQueue {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Use the registry's shared SQS client.
    pub async fn from_registry(registry: &ClientRegistry) -> Result<Self> {
        Ok(Self::new(registry.sqs().await?))
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn queue_url(&self, queue_name: &str) -> Result<String> {
        let output = self
            .client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|e| {
                queue_error(&e, queue_name, |detail| {
                    QueueError::ResolveUrl(format!("{}: {}", queue_name, detail))
                })
            })?;

        let url = output.queue_url.ok_or_else(|| {
            QueueError::ResolveUrl(format!("{}: response had no queue URL", queue_name))
        })?;
        Ok(url)
    }

    async fn send(&self, queue_url: &str, body: &str) -> Result<String> {
        let output = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                queue_error(&e, queue_url, |detail| {
                    QueueError::Send(format!("{}: {}", queue_url, detail))
                })
            })?;

        let message_id = output.message_id.ok_or_else(|| {
            QueueError::Send(format!("{}: response had no message id", queue_url))
        })?;
        Ok(message_id)
    }

    async fn receive_one(
        &self,
        queue_url: &str,
        options: &ReceiveOptions,
    ) -> Result<Option<ReceivedMessage>> {
        let response = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(1)
            .visibility_timeout(options.visibility_timeout)
            .wait_time_seconds(options.wait_time_seconds)
            .message_system_attribute_names(MessageSystemAttributeName::SentTimestamp)
            .message_attribute_names(ALL_MESSAGE_ATTRIBUTES)
            .send()
            .await
            .map_err(|e| {
                queue_error(&e, queue_url, |detail| {
                    QueueError::Receive(format!("{}: {}", queue_url, detail))
                })
            })?;

        let messages = response.messages.unwrap_or_default();
        debug!(queue_url = queue_url, count = messages.len(), "Received messages from SQS");

        match messages.into_iter().next() {
            Some(msg) => convert_message(queue_url, msg).map(Some),
            None => Ok(None),
        }
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| {
                queue_error(&e, queue_url, |detail| {
                    QueueError::Ack(format!("{}: {}", queue_url, detail))
                })
            })?;
        Ok(())
    }
}

/// Map an SQS failure to a queue error.
///
/// A missing queue becomes `QueueDoesNotExist(queue)`, refused requests become
/// `Rejected`, and everything else is built by `other` from the rendered
/// error.
fn queue_error<E, F>(err: &SdkError<E, HttpResponse>, queue: &str, other: F) -> QueueError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    F: FnOnce(String) -> QueueError,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let detail = DisplayErrorContext(err).to_string();

    match classify_service_failure(err.code(), status) {
        ServiceFailure::NotFound => QueueError::QueueDoesNotExist(queue.to_string()),
        ServiceFailure::Rejected => QueueError::Rejected(format!("{}: {}", queue, detail)),
        ServiceFailure::Other => other(detail),
    }
}

fn convert_message(queue_url: &str, msg: Message) -> Result<ReceivedMessage> {
    let receipt_handle = msg.receipt_handle.ok_or_else(|| {
        QueueError::Receive(format!("{}: message had no receipt handle", queue_url))
    })?;

    let sent_timestamp = msg
        .attributes
        .as_ref()
        .and_then(|attrs| attrs.get(&MessageSystemAttributeName::SentTimestamp))
        .and_then(|v| v.parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis);

    let attributes: HashMap<String, String> = msg
        .message_attributes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| value.string_value.map(|v| (name, v)))
        .collect();

    Ok(ReceivedMessage {
        message_id: msg.message_id.unwrap_or_default(),
        receipt_handle,
        body: msg.body.unwrap_or_default(),
        sent_timestamp,
        attributes,
    })
}
