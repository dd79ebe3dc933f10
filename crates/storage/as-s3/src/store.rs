//! S3 backend for [`ObjectStore`].

use as_error::{Result, ServiceFailure, StorageError, classify_service_failure};
use as_session::ClientRegistry;
use as_traits::ObjectStore;
use as_types::{ListPage, ListRequest, ObjectDescriptor, StoredObject};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// Object store backed by an S3 client.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Use the registry's shared S3 client.
    pub async fn from_registry(registry: &ClientRegistry) -> Result<Self> {
        Ok(Self::new(registry.s3().await?))
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        debug!(bucket = bucket, key = key, "Downloading object from S3");

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| get_object_error(bucket, key, &e))?;

        let content_type = output.content_type().map(str::to_string);
        let e_tag = output.e_tag().map(str::to_string);
        let last_modified = output.last_modified().and_then(to_utc);
        let reported_length = output.content_length();

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Body(format!("s3://{}/{}: {}", bucket, key, e)))?
            .into_bytes();

        trace!(bucket = bucket, key = key, size = body.len(), "Downloaded object");

        Ok(StoredObject {
            key: key.to_string(),
            content_length: reported_length
                .and_then(|len| u64::try_from(len).ok())
                .unwrap_or(body.len() as u64),
            body,
            content_type,
            e_tag,
            last_modified,
        })
    }

    async fn list_page(&self, request: &ListRequest) -> Result<ListPage> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&request.bucket)
            .set_prefix(request.prefix.clone())
            .set_continuation_token(request.continuation_token.clone())
            .send()
            .await
            .map_err(|e| list_error(&request.bucket, &e))?;

        let contents = resp.contents.map(|objects| {
            objects
                .into_iter()
                .filter_map(|obj| {
                    let key = obj.key?;
                    Some(ObjectDescriptor {
                        key,
                        size: obj.size.and_then(|s| u64::try_from(s).ok()).unwrap_or(0),
                        last_modified: obj.last_modified.as_ref().and_then(to_utc),
                        e_tag: obj.e_tag,
                        storage_class: obj.storage_class.map(|c| c.as_str().to_string()),
                    })
                })
                .collect()
        });

        Ok(ListPage {
            contents,
            next_continuation_token: resp.next_continuation_token,
        })
    }
}

/// Service failure kind and code of an SDK error.
fn failure_of<E: ProvideErrorMetadata>(
    err: &SdkError<E, HttpResponse>,
) -> (ServiceFailure, Option<&str>) {
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code();
    (classify_service_failure(code, status), code)
}

fn get_object_error<E>(bucket: &str, key: &str, err: &SdkError<E, HttpResponse>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let detail = format!("s3://{}/{}: {}", bucket, key, DisplayErrorContext(err));
    match failure_of(err) {
        (ServiceFailure::NotFound, Some("NoSuchBucket")) => {
            StorageError::NoSuchBucket(bucket.to_string())
        }
        (ServiceFailure::NotFound, _) => StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        (ServiceFailure::Rejected, _) => StorageError::Rejected(detail),
        (ServiceFailure::Other, _) => StorageError::Get(detail),
    }
}

fn list_error<E>(bucket: &str, err: &SdkError<E, HttpResponse>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match failure_of(err).0 {
        ServiceFailure::NotFound => StorageError::NoSuchBucket(bucket.to_string()),
        ServiceFailure::Rejected => {
            StorageError::Rejected(format!("{}: {}", bucket, DisplayErrorContext(err)))
        }
        ServiceFailure::Other => {
            StorageError::List(format!("{}: {}", bucket, DisplayErrorContext(err)))
        }
    }
}

fn to_utc(t: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}
