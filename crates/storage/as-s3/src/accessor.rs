//! Object fetch and listing operations.

use as_error::Result;
use as_session::ClientRegistry;
use as_traits::ObjectStore;
use as_types::{ObjectDescriptor, StoredObject};
use futures::{Stream, TryStreamExt};
use tracing::{Instrument, Span, error, info};

use crate::filter::KeyFilter;
use crate::list;
use crate::store::S3ObjectStore;

/// Build the key an object is stored under.
///
/// A non-empty `subfolder` is joined to `key` with a single `/`; neither part
/// is trimmed.
pub fn effective_key(subfolder: Option<&str>, key: &str) -> String {
    match subfolder {
        Some(folder) if !folder.is_empty() => format!("{folder}/{key}"),
        _ => key.to_string(),
    }
}

/// Fetches and lists objects through one [`ObjectStore`] backend.
///
/// Every operation runs inside the accessor's span, so the embedding
/// application decides where its log events go.
#[derive(Debug)]
pub struct ObjectAccessor<S> {
    store: S,
    span: Span,
}

impl ObjectAccessor<S3ObjectStore> {
    /// Accessor over the registry's shared S3 client.
    pub async fn from_registry(registry: &ClientRegistry) -> Result<Self> {
        Ok(Self::new(S3ObjectStore::from_registry(registry).await?))
    }
}

impl<S: ObjectStore> ObjectAccessor<S> {
    /// Create an accessor that logs under the caller's current span.
    pub fn new(store: S) -> Self {
        Self {
            store,
            span: Span::current(),
        }
    }

    /// Set the span operations are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch one object, optionally from a subfolder.
    pub async fn get_object(
        &self,
        bucket: &str,
        subfolder: Option<&str>,
        key: &str,
    ) -> Result<StoredObject> {
        let key = effective_key(subfolder, key);

        async {
            let result = self.store.get_object(bucket, &key).await;
            match &result {
                Ok(obj) => info!(bucket, key = %key, size = obj.body.len(), "Fetched object"),
                Err(e) => error!(bucket, key = %key, error = %e, "Error fetching object"),
            }
            result
        }
        .instrument(self.span.clone())
        .await
    }

    /// Lazily list objects in `bucket` that pass `filter`.
    ///
    /// See [`list_objects`](crate::list_objects) for the pagination contract.
    /// A failed page is logged and yielded as the stream's last item.
    pub fn list_objects<'a>(
        &'a self,
        bucket: &'a str,
        filter: KeyFilter,
    ) -> impl Stream<Item = Result<ObjectDescriptor>> + 'a {
        let span = self.span.clone();
        list::list_objects(&self.store, bucket, filter, self.span.clone()).inspect_err(
            move |e| error!(parent: &span, bucket, error = %e, "Error listing objects"),
        )
    }

    /// Lazily list objects whose key starts with `prefix` and ends with `suffix`.
    pub fn list_matching_objects<'a>(
        &'a self,
        bucket: &'a str,
        prefix: &str,
        suffix: &str,
    ) -> impl Stream<Item = Result<ObjectDescriptor>> + 'a {
        self.list_objects(bucket, KeyFilter::new(prefix, suffix))
    }

    /// Lazily list the keys of the objects [`list_objects`](Self::list_objects) yields.
    pub fn list_keys<'a>(
        &'a self,
        bucket: &'a str,
        filter: KeyFilter,
    ) -> impl Stream<Item = Result<String>> + 'a {
        self.list_objects(bucket, filter).map_ok(|obj| obj.key)
    }

    /// Lazily list keys that start with `prefix` and end with `suffix`.
    pub fn list_matching_keys<'a>(
        &'a self,
        bucket: &'a str,
        prefix: &str,
        suffix: &str,
    ) -> impl Stream<Item = Result<String>> + 'a {
        self.list_keys(bucket, KeyFilter::new(prefix, suffix))
    }

    /// Drain a listing into memory. Stops at the first error.
    pub async fn collect_objects(
        &self,
        bucket: &str,
        filter: KeyFilter,
    ) -> Result<Vec<ObjectDescriptor>> {
        self.list_objects(bucket, filter).try_collect().await
    }

    /// Drain a key listing into memory. Stops at the first error.
    pub async fn collect_keys(&self, bucket: &str, filter: KeyFilter) -> Result<Vec<String>> {
        self.list_keys(bucket, filter).try_collect().await
    }
}
