// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::ingestion_service::{IngestOutcome, IngestionService};
use crate::presentation::errors::AppError;
use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 事件类型请求头
pub const EVENT_TYPE_HEADER: &str = "X-Event-Type";
/// 签名请求头，值为 `sha256=<hex>`
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// 接收入站事件
///
/// * 202 - 已入队，返回任务ID
/// * 204 - 事件类型被订阅过滤，未入队
/// * 401 - 签名缺失或错误
/// * 404 - 订阅不存在
pub async fn ingest(
    Extension(service): Extension<Arc<IngestionService>>,
    Path(subscription_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let event_type = header_str(&headers, EVENT_TYPE_HEADER);
    let signature = header_str(&headers, SIGNATURE_HEADER);

    let outcome = service
        .ingest(&subscription_id, &body, event_type, signature)
        .await?;

    Ok(match outcome {
        IngestOutcome::Queued(task) => (
            StatusCode::ACCEPTED,
            Json(json!({ "task_id": task.id, "status": task.status })),
        )
            .into_response(),
        IngestOutcome::Filtered => StatusCode::NO_CONTENT.into_response(),
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}
