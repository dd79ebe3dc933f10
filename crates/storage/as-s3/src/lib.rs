//! as-s3 - object store access for aws-services.
//!
//! This crate provides:
//!
//! - Single object fetch with optional subfolder
//! - Paginated listing that follows continuation tokens and yields matches
//!   lazily as a stream
//! - Prefix/suffix key filtering, with a single prefix pushed to the server
//! - S3 and in-memory [`ObjectStore`](as_traits::ObjectStore) backends
//!
//! # Example
//!
//! ```ignore
//! use as_s3::{KeyFilter, ObjectAccessor};
//! use as_session::{ClientRegistry, SessionConfig};
//! use futures::{StreamExt, pin_mut};
//!
//! let registry = ClientRegistry::new(SessionConfig::from_env()?);
//! let accessor = ObjectAccessor::from_registry(&registry).await?;
//!
//! let stream = accessor.list_objects("my-bucket", KeyFilter::new("logs/2024", ".json"));
//! pin_mut!(stream);
//!
//! while let Some(result) = stream.next().await {
//!     let obj = result?;
//!     println!("{} ({} bytes)", obj.key, obj.size);
//! }
//! ```

mod accessor;
mod filter;
mod list;
mod memory;
mod store;

pub use accessor::{ObjectAccessor, effective_key};
pub use filter::KeyFilter;
pub use list::list_objects;
pub use memory::MemoryObjectStore;
pub use store::S3ObjectStore;
