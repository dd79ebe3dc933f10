//! Object store types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An object found while listing a bucket.
///
/// Everything except `key` is passed through from the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// The object key (full path within the bucket)
    pub key: String,

    /// Size of the object in bytes
    pub size: u64,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Entity tag as returned by the store (quoted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,

    /// Storage class, if reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl ObjectDescriptor {
    /// Create a descriptor with only a key and size.
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
            e_tag: None,
            storage_class: None,
        }
    }

    /// Set the last modified timestamp.
    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Set the entity tag.
    pub fn with_e_tag(mut self, e_tag: impl Into<String>) -> Self {
        self.e_tag = Some(e_tag.into());
        self
    }
}

/// A fetched object with its body held in memory.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// The effective key the object was fetched with
    pub key: String,

    /// Object contents
    pub body: Bytes,

    /// Content length reported by the store
    pub content_length: u64,

    /// Content type reported by the store
    pub content_type: Option<String>,

    /// Entity tag
    pub e_tag: Option<String>,

    /// Last modified timestamp
    pub last_modified: Option<DateTime<Utc>>,
}

/// A single list-objects page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Bucket to list
    pub bucket: String,

    /// Server-side key prefix
    pub prefix: Option<String>,

    /// Cursor returned by the previous page
    pub continuation_token: Option<String>,
}

impl ListRequest {
    /// Create a request for the first page of a bucket.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    /// Set the server-side prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the continuation token.
    pub fn with_continuation_token(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }
}

/// One page of a list-objects response.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Listed objects. `None` when the response had no contents at all,
    /// which ends the listing.
    pub contents: Option<Vec<ObjectDescriptor>>,

    /// Cursor for the next page, if any
    pub next_continuation_token: Option<String>,
}
