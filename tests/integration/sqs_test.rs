//! SQS integration tests using LocalStack.

use crate::common::{LocalStackTestContext, unique_name};
use as_error::{AsError, QueueError};
use as_sqs::QueueAccessor;

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_send_and_take_message() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let name = unique_name("as-sqs-take");
    let queue_url = ctx.create_queue(&name).await.unwrap();
    let accessor = QueueAccessor::from_registry(&ctx.registry).await.unwrap();

    let sent = accessor.send_message(&name, "hello").await.unwrap();
    assert_eq!(sent.queue_url, queue_url);

    let msg = accessor.take_message(&queue_url).await.unwrap().unwrap();
    assert_eq!(msg.message_id, sent.message_id);
    assert_eq!(msg.body, "hello");
    assert!(msg.sent_timestamp.is_some());

    assert!(accessor.take_message(&queue_url).await.unwrap().is_none());

    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_take_message_empty_queue() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let queue_url = ctx.create_queue(&unique_name("as-sqs-empty")).await.unwrap();
    let accessor = QueueAccessor::from_registry(&ctx.registry).await.unwrap();

    assert!(accessor.take_message(&queue_url).await.unwrap().is_none());

    ctx.delete_queue(&queue_url).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_send_to_missing_queue() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let accessor = QueueAccessor::from_registry(&ctx.registry).await.unwrap();
    let err = accessor
        .send_message(&unique_name("as-missing"), "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, AsError::Queue(QueueError::QueueDoesNotExist(_))));
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_broadcast_partial_failure() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let good = ctx.create_queue(&unique_name("as-sqs-fanout")).await.unwrap();
    let bad = format!("{}/000000000000/{}", ctx.endpoint, unique_name("as-missing"));
    let accessor = QueueAccessor::from_registry(&ctx.registry).await.unwrap();

    let report = accessor.send_message_to_queues([&bad, &good], "fanout").await;
    assert!(!report.is_complete());
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.delivered_count(), 1);
    assert_eq!(report.delivered[0].queue_url, good);
    assert_eq!(ctx.get_queue_message_count(&good).await.unwrap(), 1);

    ctx.delete_queue(&good).await.ok();
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_at_least_once_requires_ack() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let queue_url = ctx.create_queue(&unique_name("as-sqs-ack")).await.unwrap();
    ctx.purge_queue(&queue_url).await.ok();
    let accessor = QueueAccessor::from_registry(&ctx.registry)
        .await
        .unwrap()
        .at_least_once(30);

    accessor.send_message_to_url(&queue_url, "work").await.unwrap();

    let msg = accessor.take_message(&queue_url).await.unwrap().unwrap();
    // Hidden by the visibility timeout, not deleted
    assert!(accessor.receive_message(&queue_url).await.unwrap().is_none());

    accessor.acknowledge(&queue_url, &msg.receipt_handle).await.unwrap();
    assert_eq!(ctx.get_queue_message_count(&queue_url).await.unwrap(), 0);

    ctx.delete_queue(&queue_url).await.ok();
}
