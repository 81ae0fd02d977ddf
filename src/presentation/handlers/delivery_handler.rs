// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::delivery_log::DeliveryLog;
use crate::domain::services::delivery_query_service::{DeliveryDetail, DeliveryQueryService};
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;

/// 查询投递任务状态及全部尝试记录
pub async fn get_delivery(
    Extension(service): Extension<Arc<DeliveryQueryService>>,
    Path(task_id): Path<String>,
) -> Result<Json<DeliveryDetail>, AppError> {
    Ok(Json(service.task_detail(&task_id).await?))
}

/// 订阅最近的投递日志
pub async fn list_recent_deliveries(
    Extension(service): Extension<Arc<DeliveryQueryService>>,
    Path(subscription_id): Path<String>,
) -> Result<Json<Vec<DeliveryLog>>, AppError> {
    Ok(Json(service.recent_logs(&subscription_id).await?))
}
