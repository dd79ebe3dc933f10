//! Backend traits for aws-services.
//!
//! The accessors in `as-s3` and `as-sqs` are generic over these traits so the
//! same listing, broadcast and receive logic runs against AWS or against the
//! in-memory backends used in development and tests.
//!
//! - [`ObjectStore`] - get-object and one page of list-objects
//! - [`MessageQueue`] - resolve, send, receive one, delete

pub mod object_store;
pub mod queue;

pub use object_store::ObjectStore;
pub use queue::MessageQueue;
