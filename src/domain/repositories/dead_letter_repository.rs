// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::delivery_task_repository::RepositoryError;
use crate::domain::models::dead_letter::{DeadLetterStatus, DeadLetterTask};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 死信仓库特质
#[async_trait]
pub trait DeadLetterRepository: Send + Sync {
    /// 写入死信
    async fn create(&self, task: &DeadLetterTask) -> Result<DeadLetterTask, RepositoryError>;
    /// 根据ID查找死信
    async fn find_by_id(&self, id: &str) -> Result<Option<DeadLetterTask>, RepositoryError>;
    /// 分页查询订阅下的死信，按失败时间倒序
    async fn find_by_subscription(
        &self,
        subscription_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<DeadLetterTask>, RepositoryError>;
    /// 更新死信状态
    ///
    /// 记录不存在时返回 `RepositoryError::NotFound`
    async fn update_status(
        &self,
        id: &str,
        status: DeadLetterStatus,
        last_attempt_at: DateTime<Utc>,
        error_details: Option<String>,
    ) -> Result<(), RepositoryError>;
    /// 删除死信
    ///
    /// 记录不存在时返回 `RepositoryError::NotFound`
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
