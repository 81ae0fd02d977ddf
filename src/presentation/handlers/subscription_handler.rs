// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::subscription_request::{
    CreateSubscriptionRequestDto, UpdateSubscriptionRequestDto,
};
use crate::domain::models::subscription::Subscription;
use crate::domain::services::subscription_service::SubscriptionService;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

pub async fn create_subscription(
    Extension(service): Extension<Arc<SubscriptionService>>,
    Json(request): Json<CreateSubscriptionRequestDto>,
) -> Result<(StatusCode, Json<Subscription>), AppError> {
    request.validate().map_err(AppError::validation)?;

    let subscription = service
        .create(Subscription::new(
            request.target_url,
            request.secret,
            request.event_types,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

pub async fn list_subscriptions(
    Extension(service): Extension<Arc<SubscriptionService>>,
) -> Result<Json<Vec<Subscription>>, AppError> {
    Ok(Json(service.list().await?))
}

pub async fn get_subscription(
    Extension(service): Extension<Arc<SubscriptionService>>,
    Path(id): Path<String>,
) -> Result<Json<Subscription>, AppError> {
    Ok(Json(service.get(&id).await?))
}

pub async fn update_subscription(
    Extension(service): Extension<Arc<SubscriptionService>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubscriptionRequestDto>,
) -> Result<Json<Subscription>, AppError> {
    request.validate().map_err(AppError::validation)?;

    Ok(Json(service.update(&id, request.into()).await?))
}

pub async fn delete_subscription(
    Extension(service): Extension<Arc<SubscriptionService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
