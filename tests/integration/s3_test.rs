//! S3 integration tests using LocalStack.

use crate::common::{LocalStackTestContext, unique_name};
use as_error::{AsError, StorageError};
use as_s3::{KeyFilter, ObjectAccessor};
use futures::TryStreamExt;

async fn seeded_bucket(ctx: &LocalStackTestContext, keys: &[&str]) -> String {
    let bucket = unique_name("as-s3-test");
    ctx.create_bucket(&bucket).await.unwrap();
    for key in keys {
        ctx.put_object(&bucket, key, key).await.unwrap();
    }
    bucket
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_get_object_with_subfolder() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = seeded_bucket(&ctx, &["reports/q1.csv"]).await;
    let accessor = ObjectAccessor::from_registry(&ctx.registry).await.unwrap();

    let object = accessor
        .get_object(&bucket, Some("reports"), "q1.csv")
        .await
        .unwrap();
    assert_eq!(object.key, "reports/q1.csv");
    assert_eq!(&object.body[..], b"reports/q1.csv");
    assert_eq!(object.content_length, 14);

    ctx.delete_bucket(&bucket).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_get_missing_object_is_not_found() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = seeded_bucket(&ctx, &[]).await;
    let accessor = ObjectAccessor::from_registry(&ctx.registry).await.unwrap();

    let err = accessor.get_object(&bucket, None, "nope").await.unwrap_err();
    assert!(matches!(err, AsError::Storage(StorageError::NotFound { .. })));
    assert!(err.is_not_found());

    ctx.delete_bucket(&bucket).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_list_with_prefix_and_suffix() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = seeded_bucket(
        &ctx,
        &["logs/2024/a.json", "logs/2024/a.txt", "logs/2023/a.json"],
    )
    .await;
    let accessor = ObjectAccessor::from_registry(&ctx.registry).await.unwrap();

    let keys = accessor
        .collect_keys(&bucket, KeyFilter::new("logs/2024", ".json"))
        .await
        .unwrap();
    assert_eq!(keys, vec!["logs/2024/a.json"]);

    let objects: Vec<_> = accessor
        .list_objects(&bucket, KeyFilter::all().with_suffix(".json"))
        .try_collect()
        .await
        .unwrap();
    assert_eq!(objects.len(), 2);
    assert!(objects.iter().all(|o| o.last_modified.is_some()));

    ctx.delete_bucket(&bucket).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_list_empty_bucket() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = seeded_bucket(&ctx, &[]).await;
    let accessor = ObjectAccessor::from_registry(&ctx.registry).await.unwrap();

    let keys = accessor.collect_keys(&bucket, KeyFilter::all()).await.unwrap();
    assert!(keys.is_empty());

    ctx.delete_bucket(&bucket).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_list_missing_bucket_yields_error() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let accessor = ObjectAccessor::from_registry(&ctx.registry).await.unwrap();
    let err = accessor
        .collect_keys(&unique_name("as-missing"), KeyFilter::all())
        .await
        .unwrap_err();
    assert!(matches!(err, AsError::Storage(StorageError::NoSuchBucket(_))));
}
