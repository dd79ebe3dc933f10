//! Outcome of sending one body to many queues.

use as_error::AsError;
use as_types::SentMessage;

/// A queue a broadcast could not deliver to.
#[derive(Debug)]
pub struct BroadcastFailure {
    /// Queue the send was addressed to
    pub queue_url: String,

    /// Why the send failed
    pub error: AsError,
}

/// Per-queue results of a broadcast, in send order.
#[derive(Debug, Default)]
pub struct BroadcastReport {
    /// Successful sends
    pub delivered: Vec<SentMessage>,

    /// Failed sends
    pub failed: Vec<BroadcastFailure>,
}

impl BroadcastReport {
    /// Returns true if every queue received the message.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of queues that received the message.
    pub fn delivered_count(&self) -> usize {
        self.delivered.len()
    }

    /// Number of queues that did not.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Total number of queues addressed.
    pub fn total(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}
