//! LocalStack test context and utilities.

use as_session::{ClientRegistry, SessionConfig};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_sqs::Client as SqsClient;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

static NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Bucket/queue name unique to this process and call.
pub fn unique_name(prefix: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    let n = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, stamp, n)
}

/// LocalStack test context providing a client registry plus raw clients
/// for fixture setup.
pub struct LocalStackTestContext {
    pub registry: ClientRegistry,
    pub s3: S3Client,
    pub sqs: SqsClient,
    pub endpoint: String,
}

impl LocalStackTestContext {
    /// Create a new LocalStack test context.
    ///
    /// Uses the `LOCALSTACK_ENDPOINT` environment variable if set,
    /// otherwise defaults to `http://localhost:4566`.
    pub async fn new() -> Self {
        let endpoint = std::env::var("LOCALSTACK_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4566".to_string());

        let registry = ClientRegistry::new(Self::session_config(&endpoint));
        let s3 = registry.s3().await.expect("S3 client");
        let sqs = registry.sqs().await.expect("SQS client");

        Self {
            registry,
            s3,
            sqs,
            endpoint,
        }
    }

    /// Session configuration pointing at LocalStack with its dummy credentials.
    pub fn session_config(endpoint: &str) -> SessionConfig {
        SessionConfig::new()
            .with_credentials("test", "test")
            .with_region("us-east-1")
            .with_endpoint(endpoint)
    }

    /// Check if LocalStack is available and healthy.
    pub async fn is_available(&self) -> bool {
        // Fails quickly if LocalStack isn't running
        self.s3.list_buckets().send().await.is_ok()
    }

    /// Create a fresh S3 bucket.
    pub async fn create_bucket(&self, name: &str) -> Result<(), aws_sdk_s3::Error> {
        self.s3.create_bucket().bucket(name).send().await?;
        Ok(())
    }

    /// Upload an object.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: &str,
    ) -> Result<(), aws_sdk_s3::Error> {
        self.s3
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(data.as_bytes().to_vec().into())
            .content_type("text/plain")
            .send()
            .await?;
        Ok(())
    }

    /// Delete every object in a bucket, then the bucket.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<(), aws_sdk_s3::Error> {
        let listed = self.s3.list_objects_v2().bucket(bucket).send().await?;
        for key in listed.contents().iter().filter_map(|o| o.key()) {
            self.s3.delete_object().bucket(bucket).key(key).send().await?;
        }
        self.s3.delete_bucket().bucket(bucket).send().await?;
        Ok(())
    }

    /// Create an SQS queue and return its URL.
    pub async fn create_queue(&self, name: &str) -> Result<String, aws_sdk_sqs::Error> {
        let result = self.sqs.create_queue().queue_name(name).send().await?;
        Ok(result.queue_url.unwrap_or_default())
    }

    /// Delete an SQS queue.
    pub async fn delete_queue(&self, queue_url: &str) -> Result<(), aws_sdk_sqs::Error> {
        self.sqs.delete_queue().queue_url(queue_url).send().await?;
        Ok(())
    }

    /// Purge all messages from an SQS queue.
    pub async fn purge_queue(&self, queue_url: &str) -> Result<(), aws_sdk_sqs::Error> {
        self.sqs.purge_queue().queue_url(queue_url).send().await?;
        // Give the purge a moment to take effect
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(())
    }

    /// Approximate number of visible messages in a queue.
    pub async fn get_queue_message_count(
        &self,
        queue_url: &str,
    ) -> Result<i32, aws_sdk_sqs::Error> {
        let attrs = self
            .sqs
            .get_queue_attributes()
            .queue_url(queue_url)
            .attribute_names(aws_sdk_sqs::types::QueueAttributeName::ApproximateNumberOfMessages)
            .send()
            .await?;

        let count = attrs
            .attributes()
            .and_then(|a| {
                a.get(&aws_sdk_sqs::types::QueueAttributeName::ApproximateNumberOfMessages)
            })
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(0);

        Ok(count)
    }
}
