//! as-sqs - message queue access for aws-services.
//!
//! This crate provides:
//!
//! - Send to a queue by name (URL resolved per call)
//! - Broadcast one body to many queue URLs, reporting each outcome
//! - Receive one message, acknowledge it, or take it in one step according
//!   to a [`DeliveryMode`]
//! - SQS and in-memory [`MessageQueue`](as_traits::MessageQueue) backends
//!
//! # Example
//!
//! ```ignore
//! use as_session::{ClientRegistry, SessionConfig};
//! use as_sqs::QueueAccessor;
//!
//! let registry = ClientRegistry::new(SessionConfig::from_env()?);
//! let queues = QueueAccessor::from_registry(&registry).await?.at_least_once(60);
//!
//! queues.send_message("jobs", r#"{"id": 1}"#).await?;
//!
//! if let Some(msg) = queues.take_message(&queue_url).await? {
//!     process(&msg.body)?;
//!     queues.acknowledge(&queue_url, &msg.receipt_handle).await?;
//! }
//! ```

mod accessor;
mod broadcast;
mod memory;
mod store;

pub use accessor::{DeliveryMode, QueueAccessor};
pub use broadcast::{BroadcastFailure, BroadcastReport};
pub use memory::MemoryQueue;
pub use store::SqsQueue;
