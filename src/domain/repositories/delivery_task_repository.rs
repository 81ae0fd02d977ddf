// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::delivery_task::{DeliveryStatus, DeliveryTask};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 投递任务仓库特质
///
/// 定义投递任务数据访问接口
#[async_trait]
pub trait DeliveryTaskRepository: Send + Sync {
    /// 创建投递任务
    async fn create(&self, task: &DeliveryTask) -> Result<DeliveryTask, RepositoryError>;
    /// 根据ID查找投递任务
    async fn find_by_id(&self, id: &str) -> Result<Option<DeliveryTask>, RepositoryError>;
    /// 查找当前可尝试投递的任务
    ///
    /// 条件：status = pending，且 next_attempt_at 为空或不晚于 `now`
    async fn find_eligible(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<DeliveryTask>, RepositoryError>;
    /// 记录一次投递尝试的结果
    ///
    /// 状态、尝试次数、最近尝试时间与下次尝试时间在同一次更新中写入；
    /// `next_attempt_at` 为 `None` 时清空
    async fn record_attempt(
        &self,
        id: &str,
        status: DeliveryStatus,
        attempt_count: i32,
        last_attempt_at: DateTime<Utc>,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError>;
    /// 只更新任务状态，尝试次数保持不变
    async fn update_status(&self, id: &str, status: DeliveryStatus)
        -> Result<(), RepositoryError>;
}
