//! Object store trait.

use as_error::Result;
use as_types::{ListPage, ListRequest, StoredObject};
use async_trait::async_trait;

/// Trait for object store backends.
///
/// Implementations include:
/// - S3 (`as_s3::S3ObjectStore`)
/// - In-memory store (`as_s3::MemoryObjectStore`, for testing/development)
///
/// Pagination is driven by the caller: each call to
/// [`list_page`](ObjectStore::list_page) returns exactly one page and the
/// cursor for the next one.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetches one object by its full key.
    ///
    /// A missing key must be reported as `StorageError::NotFound`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    /// Fetches one page of a listing.
    async fn list_page(&self, request: &ListRequest) -> Result<ListPage>;
}
