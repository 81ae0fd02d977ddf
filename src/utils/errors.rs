// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::delivery_task_repository::RepositoryError;
use thiserror::Error;

/// Worker错误类型
///
/// 只表示整轮 tick 无法进行（例如拉取任务失败）；单个任务的错误在任务内部记录，
/// 不会中断同一轮里的其他任务
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("仓库错误: {0}")]
    RepositoryError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for WorkerError {
    fn from(err: RepositoryError) -> Self {
        WorkerError::RepositoryError(err.to_string())
    }
}
