// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_context, create_subscription};
use hookrelay::bootstrap::AppContext;
use hookrelay::domain::models::dead_letter::{DeadLetterStatus, DeadLetterTask};
use hookrelay::domain::models::delivery_task::{DeliveryStatus, DeliveryTask};
use hookrelay::domain::repositories::delivery_task_repository::RepositoryError;
use hookrelay::domain::services::dead_letter_service::RETRY_NOTE;

async fn seed_dead_letter(context: &AppContext, subscription_id: &str) -> DeadLetterTask {
    let mut task = DeliveryTask::new(subscription_id, r#"{"order":42}"#);
    task.attempt_count = 5;
    task.status = DeliveryStatus::Failed;
    context
        .dead_letter_repo
        .create(&DeadLetterTask::from_exhausted(
            &task,
            "http://localhost/hook",
            Some("500 Internal Server Error"),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_retry_creates_fresh_task_and_marks_entry() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    let dead_letter = seed_dead_letter(&context, &sub.id).await;

    let task = context.dead_letters.retry(&dead_letter.id).await.unwrap();
    assert_ne!(task.id, dead_letter.original_task_id);
    assert_eq!(task.subscription_id, sub.id);
    assert_eq!(task.payload, r#"{"order":42}"#);
    assert_eq!(task.attempt_count, 0);
    assert_eq!(task.status, DeliveryStatus::Pending);

    let stored = context.tasks.find_by_id(&task.id).await.unwrap();
    assert!(stored.is_some());

    let entry = context.dead_letters.get(&dead_letter.id).await.unwrap();
    assert_eq!(entry.status, DeadLetterStatus::Retried);
    assert_eq!(entry.error_details.as_deref(), Some(RETRY_NOTE));
    assert_eq!(RETRY_NOTE, "Retried via API");
}

#[tokio::test]
async fn test_retry_missing_entry_is_not_found() {
    let (context, _db) = create_context().await;
    let result = context.dead_letters.retry("missing").await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_delete_entry() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    let dead_letter = seed_dead_letter(&context, &sub.id).await;

    context.dead_letters.delete(&dead_letter.id).await.unwrap();
    assert!(matches!(
        context.dead_letters.get(&dead_letter.id).await,
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        context.dead_letters.delete(&dead_letter.id).await,
        Err(RepositoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_list_is_paged_by_twenty() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    let other = create_subscription(&context, "http://localhost/other", None, None).await;
    for _ in 0..25 {
        seed_dead_letter(&context, &sub.id).await;
    }
    seed_dead_letter(&context, &other.id).await;

    let first = context.dead_letters.list(&sub.id, 1).await.unwrap();
    let second = context.dead_letters.list(&sub.id, 2).await.unwrap();
    let third = context.dead_letters.list(&sub.id, 3).await.unwrap();
    assert_eq!(first.len(), 20);
    assert_eq!(second.len(), 5);
    assert!(third.is_empty());
    assert!(first.iter().all(|d| d.subscription_id == sub.id));

    // 页码 0 与第一页相同
    assert_eq!(context.dead_letters.list(&sub.id, 0).await.unwrap().len(), 20);
}
