// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::delivery_task_repository::RepositoryError;
use crate::domain::models::scheduled_webhook::{ScheduledStatus, ScheduledWebhook};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 定时投递仓库特质
#[async_trait]
pub trait ScheduledWebhookRepository: Send + Sync {
    /// 创建定时投递
    async fn create(&self, entry: &ScheduledWebhook) -> Result<ScheduledWebhook, RepositoryError>;
    /// 查找已到期且仍为 pending 的条目
    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledWebhook>, RepositoryError>;
    /// 分页列出条目，可按订阅过滤
    async fn list(
        &self,
        subscription_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ScheduledWebhook>, RepositoryError>;
    /// 更新状态
    async fn update_status(&self, id: &str, status: ScheduledStatus)
        -> Result<(), RepositoryError>;
    /// 删除条目
    ///
    /// 记录不存在时返回 `RepositoryError::NotFound`
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
