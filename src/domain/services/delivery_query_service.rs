// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::delivery_log::DeliveryLog;
use crate::domain::models::delivery_task::DeliveryTask;
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::domain::repositories::delivery_task_repository::{
    DeliveryTaskRepository, RepositoryError,
};
use serde::Serialize;
use std::sync::Arc;

/// 订阅最近日志的条数
pub const RECENT_LOG_LIMIT: u64 = 20;

/// 投递任务及其全部尝试记录
#[derive(Debug, Serialize)]
pub struct DeliveryDetail {
    pub task: DeliveryTask,
    pub attempts: Vec<DeliveryLog>,
}

/// 投递查询服务
///
/// 只读视图，不修改任何状态
pub struct DeliveryQueryService {
    tasks: Arc<dyn DeliveryTaskRepository>,
    logs: Arc<dyn DeliveryLogRepository>,
}

impl DeliveryQueryService {
    pub fn new(
        tasks: Arc<dyn DeliveryTaskRepository>,
        logs: Arc<dyn DeliveryLogRepository>,
    ) -> Self {
        Self { tasks, logs }
    }

    /// 查询任务详情
    pub async fn task_detail(&self, task_id: &str) -> Result<DeliveryDetail, RepositoryError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let attempts = self.logs.find_by_task(task_id).await?;

        Ok(DeliveryDetail { task, attempts })
    }

    /// 订阅最近的投递日志
    pub async fn recent_logs(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<DeliveryLog>, RepositoryError> {
        self.logs
            .find_recent_by_subscription(subscription_id, RECENT_LOG_LIMIT)
            .await
    }
}
