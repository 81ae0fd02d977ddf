// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::scheduled_request::PageQueryDto;
use crate::domain::models::dead_letter::DeadLetterTask;
use crate::domain::models::delivery_task::DeliveryTask;
use crate::domain::services::dead_letter_service::DeadLetterService;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// 分页列出订阅的死信
pub async fn list_dead_letters(
    Extension(service): Extension<Arc<DeadLetterService>>,
    Path(subscription_id): Path<String>,
    Query(query): Query<PageQueryDto>,
) -> Result<Json<Vec<DeadLetterTask>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    Ok(Json(service.list(&subscription_id, page).await?))
}

/// 重新入队，返回新建的投递任务
pub async fn retry_dead_letter(
    Extension(service): Extension<Arc<DeadLetterService>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DeliveryTask>), AppError> {
    let task = service.retry(&id).await?;
    Ok((StatusCode::ACCEPTED, Json(task)))
}

pub async fn delete_dead_letter(
    Extension(service): Extension<Arc<DeadLetterService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
