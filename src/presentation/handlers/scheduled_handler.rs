// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::scheduled_request::{CreateScheduledRequestDto, ScheduledQueryDto};
use crate::domain::models::scheduled_webhook::{Recurrence, ScheduledWebhook};
use crate::domain::services::scheduled_service::ScheduledService;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

pub async fn create_scheduled(
    Extension(service): Extension<Arc<ScheduledService>>,
    Json(request): Json<CreateScheduledRequestDto>,
) -> Result<(StatusCode, Json<ScheduledWebhook>), AppError> {
    request.validate().map_err(AppError::validation)?;

    let recurrence = Recurrence::from(request.recurrence.as_deref().unwrap_or("none"));
    if let Recurrence::Unknown(rule) = &recurrence {
        return Err(AppError::validation(format!(
            "recurrence: unsupported value '{}'",
            rule
        )));
    }

    let entry = service
        .create(
            &request.subscription_id,
            request.payload,
            request.scheduled_for,
            recurrence,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list_scheduled(
    Extension(service): Extension<Arc<ScheduledService>>,
    Query(query): Query<ScheduledQueryDto>,
) -> Result<Json<Vec<ScheduledWebhook>>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let entries = service
        .list(query.subscription_id.as_deref().filter(|s| !s.is_empty()), page)
        .await?;
    Ok(Json(entries))
}

pub async fn delete_scheduled(
    Extension(service): Extension<Arc<ScheduledService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
