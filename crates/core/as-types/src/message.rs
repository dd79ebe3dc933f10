//! Queue message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Longest short/long-poll wait the queue service accepts, in seconds.
pub const MAX_WAIT_TIME_SECONDS: i32 = 20;

/// Longest visibility timeout the queue service accepts, in seconds (12 hours).
pub const MAX_VISIBILITY_TIMEOUT_SECONDS: i32 = 43_200;

/// Result of a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    /// Queue the message was sent to
    pub queue_url: String,

    /// Identifier assigned by the queue
    pub message_id: String,
}

/// A message received from a queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedMessage {
    /// Identifier assigned by the queue at send time
    pub message_id: String,

    /// One-time handle required to delete this delivery
    pub receipt_handle: String,

    /// Message body
    pub body: String,

    /// When the message was sent, from the `SentTimestamp` system attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_timestamp: Option<DateTime<Utc>>,

    /// String-valued message attributes
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

/// Parameters of a single receive call.
///
/// At most one message is requested per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveOptions {
    /// Seconds the received message stays hidden from other receivers
    pub visibility_timeout: i32,

    /// Seconds to wait for a message (0 = short poll)
    pub wait_time_seconds: i32,
}

impl Default for ReceiveOptions {
    fn default() -> Self {
        Self {
            visibility_timeout: 0,
            wait_time_seconds: 0,
        }
    }
}

impl ReceiveOptions {
    /// Short poll with zero visibility timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the visibility timeout (0-43200).
    pub fn with_visibility_timeout(mut self, seconds: i32) -> Self {
        self.visibility_timeout = seconds.clamp(0, MAX_VISIBILITY_TIMEOUT_SECONDS);
        self
    }

    /// Set the wait time (0-20).
    pub fn with_wait_time(mut self, seconds: i32) -> Self {
        self.wait_time_seconds = seconds.clamp(0, MAX_WAIT_TIME_SECONDS);
        self
    }
}
