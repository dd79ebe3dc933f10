//! Core types for aws-services.
//!
//! This crate provides the data model shared by the storage and queue crates:
//! - [`ServiceKind`] - Which remote service a client is bound to
//! - [`ObjectDescriptor`], [`StoredObject`], [`ListPage`] - Object store types
//! - [`SentMessage`], [`ReceivedMessage`], [`ReceiveOptions`] - Queue types

pub mod message;
pub mod object;
pub mod service;

pub use message::*;
pub use object::*;
pub use service::*;
