//! In-memory object store for development and tests.

use as_error::{Result, StorageError};
use as_traits::ObjectStore;
use as_types::{ListPage, ListRequest, ObjectDescriptor, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Page size used by S3 when `MaxKeys` is not set.
const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct MemoryObject {
    body: Bytes,
    last_modified: DateTime<Utc>,
}

/// Object store that keeps buckets in memory.
///
/// Listing follows the S3 contract: keys are returned in lexicographic order,
/// `page_size` at a time, and a page with no keys has no contents at all. The
/// continuation token is the last key of the previous page.
#[derive(Debug)]
pub struct MemoryObjectStore {
    buckets: RwLock<BTreeMap<String, BTreeMap<String, MemoryObject>>>,
    page_size: usize,
    list_calls: AtomicUsize,
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryObjectStore {
    /// Create an empty store with the S3 default page size.
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(BTreeMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Set the number of keys per page (minimum 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Create a bucket if it does not exist.
    pub fn create_bucket(&self, bucket: &str) {
        self.buckets.write().entry(bucket.to_string()).or_default();
    }

    /// Store an object, creating the bucket if needed.
    pub fn put_object(&self, bucket: &str, key: &str, body: impl Into<Bytes>) {
        self.buckets
            .write()
            .entry(bucket.to_string())
            .or_default()
            .insert(
                key.to_string(),
                MemoryObject {
                    body: body.into(),
                    last_modified: Utc::now(),
                },
            );
    }

    /// Number of list-page requests served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        let buckets = self.buckets.read();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StorageError::NoSuchBucket(bucket.to_string()))?;
        let object = objects.get(key).ok_or_else(|| StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })?;

        Ok(StoredObject {
            key: key.to_string(),
            content_length: object.body.len() as u64,
            body: object.body.clone(),
            content_type: None,
            e_tag: None,
            last_modified: Some(object.last_modified),
        })
    }

    async fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        let buckets = self.buckets.read();
        let objects = buckets
            .get(&request.bucket)
            .ok_or_else(|| StorageError::NoSuchBucket(request.bucket.clone()))?;

        let start = match &request.continuation_token {
            Some(token) => Bound::Excluded(token.clone()),
            None => Bound::Unbounded,
        };
        let prefix = request.prefix.as_deref().unwrap_or("");

        let mut matching = objects
            .range((start, Bound::Unbounded))
            .filter(|(key, _)| key.starts_with(prefix));

        let page: Vec<ObjectDescriptor> = matching
            .by_ref()
            .take(self.page_size)
            .map(|(key, obj)| {
                ObjectDescriptor::new(key.clone(), obj.body.len() as u64)
                    .with_last_modified(obj.last_modified)
            })
            .collect();

        let has_more = matching.next().is_some();
        let next_continuation_token = match page.last() {
            Some(last) if has_more => Some(last.key.clone()),
            _ => None,
        };

        Ok(ListPage {
            contents: (!page.is_empty()).then_some(page),
            next_continuation_token,
        })
    }
}
