// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_context, create_subscription, test_settings};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hookrelay::bootstrap::AppContext;
use hookrelay::domain::models::delivery_task::{DeliveryStatus, DeliveryTask};
use hookrelay::domain::models::scheduled_webhook::{Recurrence, ScheduledStatus, ScheduledWebhook};
use hookrelay::domain::repositories::delivery_task_repository::{
    DeliveryTaskRepository, RepositoryError,
};
use hookrelay::workers::scheduled_worker::ScheduledWorker;
use sea_orm::DbErr;
use std::sync::Arc;

async fn schedule(
    context: &AppContext,
    subscription_id: &str,
    scheduled_for: DateTime<Utc>,
    recurrence: &str,
) -> ScheduledWebhook {
    context
        .scheduled_repo
        .create(&ScheduledWebhook::new(
            subscription_id,
            r#"{"tick":true}"#,
            scheduled_for,
            Recurrence::from(recurrence),
        ))
        .await
        .unwrap()
}

async fn entries_for(context: &AppContext, subscription_id: &str) -> Vec<ScheduledWebhook> {
    context
        .scheduled_repo
        .list(Some(subscription_id), 100, 0)
        .await
        .unwrap()
}

async fn pending_tasks(context: &AppContext) -> Vec<DeliveryTask> {
    context.tasks.find_eligible(Utc::now(), 100).await.unwrap()
}

#[tokio::test]
async fn test_one_off_entry_is_materialized_once() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    let entry = schedule(&context, &sub.id, Utc::now() - Duration::minutes(1), "").await;

    let worker = context.scheduled_worker();
    assert_eq!(worker.process_due_entries().await.unwrap(), 1);

    let tasks = pending_tasks(&context).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].subscription_id, sub.id);
    assert_eq!(tasks[0].payload, r#"{"tick":true}"#);
    assert_eq!(tasks[0].status, DeliveryStatus::Pending);

    let entries = entries_for(&context, &sub.id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, entry.id);
    assert_eq!(entries[0].status, ScheduledStatus::Delivered);

    // 不会重复物化
    assert_eq!(worker.process_due_entries().await.unwrap(), 0);
    assert_eq!(pending_tasks(&context).await.len(), 1);
}

#[tokio::test]
async fn test_daily_entry_creates_successor() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    let scheduled_for = Utc::now() - Duration::minutes(5);
    let entry = schedule(&context, &sub.id, scheduled_for, "daily").await;

    context.scheduled_worker().process_due_entries().await.unwrap();

    let entries = entries_for(&context, &sub.id).await;
    assert_eq!(entries.len(), 2);

    let original = entries.iter().find(|e| e.id == entry.id).unwrap();
    assert_eq!(original.status, ScheduledStatus::Delivered);

    let successor = entries.iter().find(|e| e.id != entry.id).unwrap();
    assert_eq!(successor.status, ScheduledStatus::Pending);
    assert_eq!(successor.recurrence, Recurrence::Daily);
    assert_eq!(successor.payload, entry.payload);
    let expected = scheduled_for + Duration::days(1);
    assert!((successor.scheduled_for - expected).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_missed_recurrence_does_not_create_successor() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    schedule(&context, &sub.id, Utc::now() - Duration::days(3), "daily").await;

    context.scheduled_worker().process_due_entries().await.unwrap();

    let entries = entries_for(&context, &sub.id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, ScheduledStatus::Delivered);
    assert_eq!(pending_tasks(&context).await.len(), 1);
}

#[tokio::test]
async fn test_unknown_recurrence_is_treated_as_one_off() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    schedule(&context, &sub.id, Utc::now() - Duration::minutes(1), "hourly").await;

    context.scheduled_worker().process_due_entries().await.unwrap();

    let entries = entries_for(&context, &sub.id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, ScheduledStatus::Delivered);
    assert_eq!(
        entries[0].recurrence,
        Recurrence::Unknown("hourly".to_string())
    );
}

#[tokio::test]
async fn test_future_entry_is_left_alone() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    schedule(&context, &sub.id, Utc::now() + Duration::hours(1), "daily").await;

    assert_eq!(
        context.scheduled_worker().process_due_entries().await.unwrap(),
        0
    );
    let entries = entries_for(&context, &sub.id).await;
    assert_eq!(entries[0].status, ScheduledStatus::Pending);
    assert!(pending_tasks(&context).await.is_empty());
}

/// 创建总是失败的任务仓库
struct FailingTaskRepository;

#[async_trait]
impl DeliveryTaskRepository for FailingTaskRepository {
    async fn create(&self, _task: &DeliveryTask) -> Result<DeliveryTask, RepositoryError> {
        Err(RepositoryError::Database(DbErr::Custom(
            "insert rejected".to_string(),
        )))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<DeliveryTask>, RepositoryError> {
        Ok(None)
    }

    async fn find_eligible(
        &self,
        _now: DateTime<Utc>,
        _limit: u64,
    ) -> Result<Vec<DeliveryTask>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn record_attempt(
        &self,
        _id: &str,
        _status: DeliveryStatus,
        _attempt_count: i32,
        _last_attempt_at: DateTime<Utc>,
        _next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn update_status(
        &self,
        _id: &str,
        _status: DeliveryStatus,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_task_creation_failure_marks_entry_failed() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://localhost/hook", None, None).await;
    schedule(&context, &sub.id, Utc::now() - Duration::minutes(1), "weekly").await;

    let worker = ScheduledWorker::new(
        context.scheduled_repo.clone(),
        Arc::new(FailingTaskRepository),
        &test_settings().scheduler,
    );
    assert_eq!(worker.process_due_entries().await.unwrap(), 0);

    let entries = entries_for(&context, &sub.id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, ScheduledStatus::Failed);
}
