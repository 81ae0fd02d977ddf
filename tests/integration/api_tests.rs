// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;
use bytes::Bytes;
use chrono::{Duration, Utc};
use hookrelay::domain::models::dead_letter::DeadLetterTask;
use hookrelay::domain::models::delivery_task::DeliveryTask;
use hookrelay::utils::signature;
use serde_json::{json, Value};

#[tokio::test]
async fn test_subscription_crud() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/subscriptions")
        .json(&json!({
            "target_url": "https://example.com/hook",
            "secret": "abc",
            "event_types": "order.created,order.paid"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap().to_string();

    let response = app.server.get(&format!("/subscriptions/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["target_url"], "https://example.com/hook");

    let response = app.server.get("/subscriptions").await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = app
        .server
        .put(&format!("/subscriptions/{}", id))
        .json(&json!({ "target_url": "https://example.com/v2" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["target_url"], "https://example.com/v2");
    assert_eq!(updated["event_types"], "order.created,order.paid");

    let response = app.server.delete(&format!("/subscriptions/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app.server.get(&format!("/subscriptions/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_subscription_rejects_invalid_url() {
    let app = create_test_app().await;
    let response = app
        .server
        .post("/subscriptions")
        .json(&json!({ "target_url": "not a url" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ingest_endpoint_status_codes() {
    let app = create_test_app().await;
    let sub = super::helpers::create_subscription(
        &app.context,
        "http://localhost/hook",
        Some("abc"),
        Some("order.created"),
    )
    .await;
    let body = br#"{"x":1}"#;
    let sig = signature::sign(body, "abc").unwrap();
    let uri = format!("/ingest/{}", sub.id);

    let response = app
        .server
        .post(&uri)
        .add_header("X-Event-Type", "order.created")
        .add_header("X-Hub-Signature-256", sig.clone())
        .bytes(Bytes::from_static(body))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let queued: Value = response.json();
    assert_eq!(queued["status"], "pending");
    let task_id = queued["task_id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post(&uri)
        .add_header("X-Event-Type", "order.updated")
        .bytes(Bytes::from_static(body))
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app
        .server
        .post(&uri)
        .add_header("X-Event-Type", "order.created")
        .add_header("X-Hub-Signature-256", "sha256=deadbeef")
        .bytes(Bytes::from_static(body))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/ingest/missing")
        .bytes(Bytes::from_static(body))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.server.get(&format!("/deliveries/{}", task_id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let detail: Value = response.json();
    assert_eq!(detail["task"]["id"], task_id.as_str());
    assert_eq!(detail["attempts"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_delivery_is_not_found() {
    let app = create_test_app().await;
    let response = app.server.get("/deliveries/missing").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dead_letter_endpoints() {
    let app = create_test_app().await;
    let sub = super::helpers::create_subscription(&app.context, "http://localhost/hook", None, None)
        .await;
    let mut task = DeliveryTask::new(sub.id.clone(), "{}");
    task.attempt_count = 5;
    let dead_letter = app
        .context
        .dead_letter_repo
        .create(&DeadLetterTask::from_exhausted(&task, &sub.target_url, None))
        .await
        .unwrap();

    let response = app
        .server
        .get(&format!("/subscriptions/{}/dlq", sub.id))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = app
        .server
        .post(&format!("/dlq/{}/retry", dead_letter.id))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    let retried: Value = response.json();
    assert_eq!(retried["attempt_count"], 0);

    let response = app.server.post("/dlq/missing/retry").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.server.delete(&format!("/dlq/{}", dead_letter.id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app.server.delete(&format!("/dlq/{}", dead_letter.id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scheduled_endpoints() {
    let app = create_test_app().await;
    let sub = super::helpers::create_subscription(&app.context, "http://localhost/hook", None, None)
        .await;
    let scheduled_for = Utc::now() + Duration::hours(2);

    let response = app
        .server
        .post("/scheduled")
        .json(&json!({
            "subscription_id": sub.id,
            "payload": "{\"tick\":1}",
            "scheduled_for": scheduled_for,
            "recurrence": "weekly"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    assert_eq!(created["recurrence"], "weekly");
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post("/scheduled")
        .json(&json!({
            "subscription_id": sub.id,
            "payload": "{}",
            "scheduled_for": scheduled_for,
            "recurrence": "hourly"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/scheduled")
        .json(&json!({
            "subscription_id": "missing",
            "payload": "{}",
            "scheduled_for": scheduled_for
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .server
        .get("/scheduled")
        .add_query_param("subscription_id", &sub.id)
        .await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);

    let response = app.server.delete(&format!("/scheduled/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
    let response = app.server.delete(&format!("/scheduled/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
