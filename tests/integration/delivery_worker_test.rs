// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    create_context, create_context_with, create_subscription, make_due, test_settings,
};
use chrono::{Duration as ChronoDuration, Utc};
use hookrelay::domain::models::delivery_log::DeliveryOutcome;
use hookrelay::domain::models::delivery_task::{DeliveryStatus, DeliveryTask};
use hookrelay::domain::services::subscription_service::SubscriptionUpdate;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn enqueue(context: &hookrelay::bootstrap::AppContext, subscription_id: &str) -> DeliveryTask {
    context
        .tasks
        .create(&DeliveryTask::new(subscription_id, r#"{"x":1}"#))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_successful_delivery_marks_task_delivered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"x":1}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, &format!("{}/hook", server.uri()), None, None).await;
    let task = enqueue(&context, &sub.id).await;

    let worker = context.delivery_worker().unwrap();
    assert_eq!(worker.process_pending_deliveries().await.unwrap(), 1);

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Delivered);
    assert_eq!(stored.attempt_count, 1);
    assert!(stored.last_attempt_at.is_some());

    let logs = context.logs.find_by_task(&task.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].outcome, DeliveryOutcome::Success);
    assert_eq!(logs[0].http_status, Some(200));
    assert_eq!(logs[0].attempt_number, 1);

    // 已投递的任务不再被拉取
    assert_eq!(worker.process_pending_deliveries().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_attempt_schedules_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, &server.uri(), None, None).await;
    let task = enqueue(&context, &sub.id).await;

    let worker = context.delivery_worker().unwrap();
    let before = Utc::now();
    assert_eq!(worker.process_pending_deliveries().await.unwrap(), 1);

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Pending);
    assert_eq!(stored.attempt_count, 1);

    let next = stored.next_attempt_at.unwrap();
    assert!(next >= before + ChronoDuration::seconds(10));
    assert!(next <= Utc::now() + ChronoDuration::seconds(11));

    let logs = context.logs.find_by_task(&task.id).await.unwrap();
    assert_eq!(logs[0].outcome, DeliveryOutcome::FailedAttempt);
    assert_eq!(logs[0].http_status, Some(503));
    assert_eq!(
        logs[0].error_details.as_deref(),
        Some("503 Service Unavailable")
    );

    // 退避期间不可投递
    assert_eq!(worker.process_pending_deliveries().await.unwrap(), 0);
}

#[tokio::test]
async fn test_exhausted_task_moves_to_dead_letter_queue() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&server)
        .await;

    let (context, db) = create_context().await;
    let sub = create_subscription(&context, &server.uri(), None, None).await;
    let task = enqueue(&context, &sub.id).await;
    let worker = context.delivery_worker().unwrap();

    for round in 0..6 {
        // 跳过退避等待
        make_due(&db, &task.id).await;
        let processed = worker.process_pending_deliveries().await.unwrap();
        if round < 5 {
            assert_eq!(processed, 1, "round {}", round);
        } else {
            assert_eq!(processed, 0);
        }
    }

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Failed);
    assert_eq!(stored.attempt_count, 5);

    let logs = context.logs.find_by_task(&task.id).await.unwrap();
    let attempts: Vec<i32> = logs.iter().map(|l| l.attempt_number).collect();
    assert_eq!(attempts, vec![1, 2, 3, 4, 5]);

    let dead_letters = context.dead_letters.list(&sub.id, 1).await.unwrap();
    assert_eq!(dead_letters.len(), 1);
    let dead_letter = &dead_letters[0];
    assert_eq!(dead_letter.original_task_id, task.id);
    assert_eq!(dead_letter.attempt_count, 5);
    assert_eq!(dead_letter.payload, task.payload);
    assert_eq!(dead_letter.target_url.as_deref(), Some(server.uri().as_str()));
    assert_eq!(
        dead_letter.error_details.as_deref(),
        Some("500 Internal Server Error")
    );
}

#[tokio::test]
async fn test_transport_error_is_logged_without_status() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://127.0.0.1:1/hook", None, None).await;
    let task = enqueue(&context, &sub.id).await;

    let worker = context.delivery_worker().unwrap();
    worker.process_pending_deliveries().await.unwrap();

    let logs = context.logs.find_by_task(&task.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].outcome, DeliveryOutcome::FailedAttempt);
    assert_eq!(logs[0].http_status, None);
    assert!(logs[0].error_details.is_some());

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Pending);
}

#[tokio::test]
async fn test_slow_receiver_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, &server.uri(), None, None).await;
    let task = enqueue(&context, &sub.id).await;

    let worker = context.delivery_worker().unwrap();
    worker.process_pending_deliveries().await.unwrap();

    let logs = context.logs.find_by_task(&task.id).await.unwrap();
    assert_eq!(logs[0].outcome, DeliveryOutcome::FailedAttempt);
    assert_eq!(logs[0].http_status, None);

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Pending);
    assert_eq!(stored.attempt_count, 1);
}

#[tokio::test]
async fn test_task_for_deleted_subscription_is_failed_without_attempt() {
    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, "http://127.0.0.1:1", None, None).await;
    let task = enqueue(&context, &sub.id).await;
    context.subscriptions.delete(&sub.id).await.unwrap();

    let worker = context.delivery_worker().unwrap();
    assert_eq!(worker.process_pending_deliveries().await.unwrap(), 1);

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Failed);
    assert_eq!(stored.attempt_count, 0);
    assert!(context.logs.find_by_task(&task.id).await.unwrap().is_empty());
    assert!(context.dead_letters.list(&sub.id, 1).await.unwrap().is_empty());

    // 不再占用待投递队列
    assert_eq!(worker.process_pending_deliveries().await.unwrap(), 0);
}

#[tokio::test]
async fn test_orphaned_tasks_do_not_block_newer_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = test_settings();
    settings.delivery.batch_size = 2;
    let (context, _db) = create_context_with(settings).await;

    let gone = create_subscription(&context, "http://127.0.0.1:1", None, None).await;
    enqueue(&context, &gone.id).await;
    enqueue(&context, &gone.id).await;
    context.subscriptions.delete(&gone.id).await.unwrap();

    let live = create_subscription(&context, &server.uri(), None, None).await;
    let task = enqueue(&context, &live.id).await;

    let worker = context.delivery_worker().unwrap();
    for _ in 0..3 {
        worker.process_pending_deliveries().await.unwrap();
    }

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Delivered);
    assert_eq!(stored.attempt_count, 1);
}

#[tokio::test]
async fn test_failing_task_does_not_abort_siblings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let (context, _db) = create_context().await;
    let live = create_subscription(&context, &server.uri(), None, None).await;
    let unreachable = create_subscription(&context, "http://127.0.0.1:1/hook", None, None).await;
    let gone = create_subscription(&context, "http://127.0.0.1:1/gone", None, None).await;

    let first = enqueue(&context, &live.id).await;
    let broken = enqueue(&context, &unreachable.id).await;
    let orphan = enqueue(&context, &gone.id).await;
    let second = enqueue(&context, &live.id).await;
    context.subscriptions.delete(&gone.id).await.unwrap();

    let worker = context.delivery_worker().unwrap();
    assert_eq!(worker.process_pending_deliveries().await.unwrap(), 4);

    for id in [&first.id, &second.id] {
        let stored = context.tasks.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.status, DeliveryStatus::Delivered);
    }

    let stored = context.tasks.find_by_id(&broken.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Pending);
    assert_eq!(stored.attempt_count, 1);

    let stored = context.tasks.find_by_id(&orphan.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Failed);
}

#[tokio::test]
async fn test_attempt_count_matches_first_successful_tick() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (context, db) = create_context().await;
    let sub = create_subscription(&context, &server.uri(), None, None).await;
    let task = enqueue(&context, &sub.id).await;
    let worker = context.delivery_worker().unwrap();

    worker.process_pending_deliveries().await.unwrap();
    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Pending);
    assert_eq!(stored.attempt_count, 1);
    assert!(stored.last_attempt_at.is_some());
    assert!(stored.next_attempt_at.is_some());

    make_due(&db, &task.id).await;
    worker.process_pending_deliveries().await.unwrap();

    let stored = context.tasks.find_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DeliveryStatus::Delivered);
    assert_eq!(stored.attempt_count, 2);
    assert_eq!(stored.next_attempt_at, None);

    let outcomes: Vec<DeliveryOutcome> = context
        .logs
        .find_by_task(&task.id)
        .await
        .unwrap()
        .iter()
        .map(|l| l.outcome)
        .collect();
    assert_eq!(
        outcomes,
        vec![DeliveryOutcome::FailedAttempt, DeliveryOutcome::Success]
    );
    assert!(context.dead_letters.list(&sub.id, 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_updated_target_url_is_used_immediately() {
    let old = MockServer::start().await;
    let new = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&old)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&new)
        .await;

    let (context, _db) = create_context().await;
    let sub = create_subscription(&context, &old.uri(), None, None).await;
    // 预热缓存
    context.subscriptions.resolve(&sub.id).await.unwrap();

    context
        .subscriptions
        .update(
            &sub.id,
            SubscriptionUpdate {
                target_url: Some(new.uri()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let task = enqueue(&context, &sub.id).await;
    let worker = context.delivery_worker().unwrap();
    worker.process_pending_deliveries().await.unwrap();

    let logs = context.logs.find_by_task(&task.id).await.unwrap();
    assert_eq!(logs[0].target_url, new.uri());
    assert_eq!(logs[0].outcome, DeliveryOutcome::Success);
}
