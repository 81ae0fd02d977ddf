// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::delivery_task_repository::RepositoryError;
use crate::domain::models::delivery_log::DeliveryLog;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 投递日志仓库特质
#[async_trait]
pub trait DeliveryLogRepository: Send + Sync {
    /// 追加一条投递日志
    async fn create(&self, log: &DeliveryLog) -> Result<DeliveryLog, RepositoryError>;
    /// 查询某个任务的全部日志，按尝试序号升序
    async fn find_by_task(&self, task_id: &str) -> Result<Vec<DeliveryLog>, RepositoryError>;
    /// 查询订阅最近的日志，按时间倒序
    async fn find_recent_by_subscription(
        &self,
        subscription_id: &str,
        limit: u64,
    ) -> Result<Vec<DeliveryLog>, RepositoryError>;
    /// 删除早于指定时间的日志，返回删除条数
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, RepositoryError>;
}
