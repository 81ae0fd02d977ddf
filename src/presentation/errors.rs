// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::repositories::delivery_task_repository::RepositoryError;
use crate::domain::services::ingestion_service::IngestionError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 请求参数校验失败
    pub fn validation(detail: impl std::fmt::Display) -> Self {
        Self(anyhow::anyhow!("Validation error: {}", detail))
    }

    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<RepositoryError>() {
            return repository_status(err);
        }

        match self.0.downcast_ref::<IngestionError>() {
            Some(IngestionError::SubscriptionNotFound) => StatusCode::NOT_FOUND,
            Some(IngestionError::InvalidSignature) => StatusCode::UNAUTHORIZED,
            Some(IngestionError::InvalidPayload) => StatusCode::BAD_REQUEST,
            Some(IngestionError::Repository(err)) => repository_status(err),
            None => {
                let message = self.0.to_string().to_lowercase();
                if message.starts_with("validation error") {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
