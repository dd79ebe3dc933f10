//! Session and client registry tests using LocalStack.

use crate::common::LocalStackTestContext;
use as_session::{ClientRegistry, ServiceClient, create_client};
use as_types::ServiceKind;

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_create_client_by_name() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let config = LocalStackTestContext::session_config(&ctx.endpoint);

    let client = create_client(&config, "S3").await.unwrap();
    let s3 = client.into_s3().unwrap();
    assert!(s3.list_buckets().send().await.is_ok());

    let client = create_client(&config, "sqs").await.unwrap();
    assert!(matches!(client, ServiceClient::Sqs(_)));

    assert!(create_client(&config, "dynamodb").await.is_err());
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_registry_initializes_lazily() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let registry = ClientRegistry::new(LocalStackTestContext::session_config(&ctx.endpoint));
    assert!(!registry.is_initialized(ServiceKind::Sqs));

    let sqs = registry.client("sqs").await.unwrap().into_sqs().unwrap();
    assert!(registry.is_initialized(ServiceKind::Sqs));
    assert!(!registry.is_initialized(ServiceKind::S3));
    assert!(sqs.list_queues().send().await.is_ok());
}
