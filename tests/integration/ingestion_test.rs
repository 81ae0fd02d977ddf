// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_context, create_subscription};
use chrono::Utc;
use hookrelay::domain::services::ingestion_service::{IngestOutcome, IngestionError};
use hookrelay::utils::signature;

const PAYLOAD: &[u8] = br#"{"x":1}"#;

#[tokio::test]
async fn test_signed_event_is_queued() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(
        &context,
        "http://localhost/hook",
        Some("abc"),
        Some("order.created"),
    )
    .await;
    let sig = signature::sign(PAYLOAD, "abc").unwrap();

    let outcome = context
        .ingestion
        .ingest(&sub.id, PAYLOAD, Some("order.created"), Some(&sig))
        .await
        .unwrap();

    let IngestOutcome::Queued(task) = outcome else {
        panic!("expected queued outcome");
    };
    assert_eq!(task.subscription_id, sub.id);
    assert_eq!(task.payload, r#"{"x":1}"#);
    assert_eq!(task.attempt_count, 0);

    let eligible = context.tasks.find_eligible(Utc::now(), 10).await.unwrap();
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].id, task.id);
}

#[tokio::test]
async fn test_wrong_signature_is_rejected() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", Some("abc"), None).await;
    let sig = signature::sign(PAYLOAD, "not-the-secret").unwrap();

    let result = context
        .ingestion
        .ingest(&sub.id, PAYLOAD, None, Some(&sig))
        .await;
    assert!(matches!(result, Err(IngestionError::InvalidSignature)));

    let missing = context.ingestion.ingest(&sub.id, PAYLOAD, None, None).await;
    assert!(matches!(missing, Err(IngestionError::InvalidSignature)));

    assert!(context
        .tasks
        .find_eligible(Utc::now(), 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_filtered_event_is_dropped_before_signature_check() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(
        &context,
        "http://localhost/hook",
        Some("abc"),
        Some("order.created"),
    )
    .await;

    // 被过滤的事件不需要有效签名
    let outcome = context
        .ingestion
        .ingest(&sub.id, PAYLOAD, Some("order.updated"), Some("sha256=00"))
        .await
        .unwrap();
    assert!(matches!(outcome, IngestOutcome::Filtered));
    assert!(context
        .tasks
        .find_eligible(Utc::now(), 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unsigned_subscription_accepts_any_body() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;

    let outcome = context
        .ingestion
        .ingest(&sub.id, b"plain text", Some("anything"), None)
        .await
        .unwrap();
    assert!(matches!(outcome, IngestOutcome::Queued(_)));
}

#[tokio::test]
async fn test_unknown_subscription() {
    let (context, _db) = create_context().await;
    let result = context
        .ingestion
        .ingest("missing", PAYLOAD, None, None)
        .await;
    assert!(matches!(result, Err(IngestionError::SubscriptionNotFound)));
}

#[tokio::test]
async fn test_non_utf8_body_is_rejected() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    let result = context
        .ingestion
        .ingest(&sub.id, &[0xff, 0xfe, 0x00], None, None)
        .await;
    assert!(matches!(result, Err(IngestionError::InvalidPayload)));
}
