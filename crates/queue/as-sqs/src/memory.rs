//! In-memory message queue for development and tests.

use as_error::{QueueError, Result};
use as_traits::MessageQueue;
use as_types::{ReceiveOptions, ReceivedMessage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

/// URL scheme given to in-memory queues.
const MEMORY_URL_PREFIX: &str = "memory://queues/";

#[derive(Debug, Clone)]
struct StoredMessage {
    id: String,
    body: String,
    sent_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct QueueState {
    visible: VecDeque<StoredMessage>,
    in_flight: HashMap<String, StoredMessage>,
    /// Receipt handle to message id. Only the latest receipt per message is
    /// kept, as with SQS, where earlier handles stop working.
    receipts: HashMap<String, String>,
}

/// Message queue that keeps queues in memory.
///
/// Visibility is simplified: a message received with a zero visibility
/// timeout stays visible at the head of its queue; with a non-zero timeout it
/// is hidden until deleted and never becomes visible again on its own. Every
/// receive issues a fresh receipt handle that replaces the previous one, so
/// only the most recent handle deletes the message.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    queues: Mutex<HashMap<String, QueueState>>,
    next_id: AtomicU64,
}

impl MemoryQueue {
    /// Create a queue service with no queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue and return its URL. Existing queues are kept as is.
    pub fn create_queue(&self, queue_name: &str) -> String {
        self.queues.lock().entry(queue_name.to_string()).or_default();
        format!("{MEMORY_URL_PREFIX}{queue_name}")
    }

    /// Number of visible messages in a queue (0 if it does not exist).
    pub fn visible_count(&self, queue_url: &str) -> usize {
        self.with_queue(queue_url, |q| q.visible.len()).unwrap_or(0)
    }

    /// Number of hidden, undeleted messages in a queue (0 if it does not exist).
    pub fn in_flight_count(&self, queue_url: &str) -> usize {
        self.with_queue(queue_url, |q| q.in_flight.len()).unwrap_or(0)
    }

    fn next(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn with_queue<T>(&self, queue_url: &str, f: impl FnOnce(&mut QueueState) -> T) -> Result<T> {
        let mut queues = self.queues.lock();
        let state = queue_name(queue_url)
            .and_then(|name| queues.get_mut(name))
            .ok_or_else(|| QueueError::QueueDoesNotExist(queue_url.to_string()))?;
        Ok(f(state))
    }
}

fn queue_name(queue_url: &str) -> Option<&str> {
    queue_url.strip_prefix(MEMORY_URL_PREFIX)
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn queue_url(&self, queue_name: &str) -> Result<String> {
        if self.queues.lock().contains_key(queue_name) {
            Ok(format!("{MEMORY_URL_PREFIX}{queue_name}"))
        } else {
            Err(QueueError::QueueDoesNotExist(queue_name.to_string()).into())
        }
    }

    async fn send(&self, queue_url: &str, body: &str) -> Result<String> {
        let id = format!("msg-{}", self.next());
        let message = StoredMessage {
            id: id.clone(),
            body: body.to_string(),
            sent_at: Utc::now(),
        };
        self.with_queue(queue_url, |q| q.visible.push_back(message))?;
        Ok(id)
    }

    async fn receive_one(
        &self,
        queue_url: &str,
        options: &ReceiveOptions,
    ) -> Result<Option<ReceivedMessage>> {
        let receipt_handle = format!("receipt-{}", self.next());

        self.with_queue(queue_url, |q| {
            let message = if options.visibility_timeout > 0 {
                let message = q.visible.pop_front()?;
                q.in_flight.insert(message.id.clone(), message.clone());
                message
            } else {
                q.visible.front()?.clone()
            };

            q.receipts.retain(|_, id| *id != message.id);
            q.receipts.insert(receipt_handle.clone(), message.id.clone());

            Some(ReceivedMessage {
                message_id: message.id,
                receipt_handle,
                body: message.body,
                sent_timestamp: Some(message.sent_at),
                attributes: HashMap::new(),
            })
        })
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        let deleted = self.with_queue(queue_url, |q| {
            let id = q.receipts.remove(receipt_handle)?;
            q.receipts.retain(|_, other| *other != id);
            q.visible.retain(|m| m.id != id);
            q.in_flight.remove(&id);
            Some(())
        })?;

        deleted.ok_or_else(|| {
            QueueError::Rejected(format!("ReceiptHandleIsInvalid: {}", receipt_handle)).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_url_resolution() {
        let queues = MemoryQueue::new();
        let url = queues.create_queue("jobs");

        assert_eq!(queues.queue_url("jobs").await.unwrap(), url);
        let err = queues.queue_url("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_zero_visibility_keeps_message_visible() {
        let queues = MemoryQueue::new();
        let url = queues.create_queue("jobs");
        queues.send(&url, "a").await.unwrap();

        let options = ReceiveOptions::new();
        let first = queues.receive_one(&url, &options).await.unwrap().unwrap();
        let second = queues.receive_one(&url, &options).await.unwrap().unwrap();

        assert_eq!(first.message_id, second.message_id);
        assert_ne!(first.receipt_handle, second.receipt_handle);
        assert_eq!(queues.visible_count(&url), 1);

        assert!(queues.delete(&url, &first.receipt_handle).await.is_err());
        queues.delete(&url, &second.receipt_handle).await.unwrap();
        assert_eq!(queues.visible_count(&url), 0);
    }

    #[tokio::test]
    async fn test_repeated_polls_keep_one_receipt() {
        let queues = MemoryQueue::new();
        let url = queues.create_queue("jobs");
        queues.send(&url, "a").await.unwrap();

        let options = ReceiveOptions::new();
        for _ in 0..50 {
            queues.receive_one(&url, &options).await.unwrap().unwrap();
        }

        assert_eq!(queues.with_queue(&url, |q| q.receipts.len()).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_visibility_timeout_hides_message() {
        let queues = MemoryQueue::new();
        let url = queues.create_queue("jobs");
        queues.send(&url, "a").await.unwrap();

        let options = ReceiveOptions::new().with_visibility_timeout(30);
        let msg = queues.receive_one(&url, &options).await.unwrap().unwrap();
        assert!(queues.receive_one(&url, &options).await.unwrap().is_none());
        assert_eq!(queues.in_flight_count(&url), 1);

        queues.delete(&url, &msg.receipt_handle).await.unwrap();
        assert_eq!(queues.in_flight_count(&url), 0);
    }

    #[tokio::test]
    async fn test_unknown_queue_url() {
        let queues = MemoryQueue::new();
        assert!(queues.send("memory://queues/none", "x").await.is_err());
        assert!(queues.send("https://elsewhere/none", "x").await.is_err());
    }
}
