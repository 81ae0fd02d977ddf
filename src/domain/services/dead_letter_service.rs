// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::dead_letter::{DeadLetterStatus, DeadLetterTask};
use crate::domain::models::delivery_task::DeliveryTask;
use crate::domain::repositories::dead_letter_repository::DeadLetterRepository;
use crate::domain::repositories::delivery_task_repository::{
    DeliveryTaskRepository, RepositoryError,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// 死信列表分页大小
pub const DEAD_LETTER_PAGE_SIZE: u64 = 20;

/// 重新入队时写入死信的说明
pub const RETRY_NOTE: &str = "Retried via API";

/// 死信管理服务
///
/// 重新入队会生成一条全新的投递任务（尝试次数从 0 开始），
/// 原死信标记为 retried 并保留。
pub struct DeadLetterService {
    dead_letters: Arc<dyn DeadLetterRepository>,
    tasks: Arc<dyn DeliveryTaskRepository>,
}

impl DeadLetterService {
    pub fn new(
        dead_letters: Arc<dyn DeadLetterRepository>,
        tasks: Arc<dyn DeliveryTaskRepository>,
    ) -> Self {
        Self {
            dead_letters,
            tasks,
        }
    }

    /// 分页列出订阅的死信，`page` 从 1 开始
    pub async fn list(
        &self,
        subscription_id: &str,
        page: u64,
    ) -> Result<Vec<DeadLetterTask>, RepositoryError> {
        let offset = page.saturating_sub(1) * DEAD_LETTER_PAGE_SIZE;
        self.dead_letters
            .find_by_subscription(subscription_id, DEAD_LETTER_PAGE_SIZE, offset)
            .await
    }

    /// 获取单条死信
    pub async fn get(&self, id: &str) -> Result<DeadLetterTask, RepositoryError> {
        self.dead_letters
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// 重新入队
    ///
    /// 返回新建的投递任务；死信不存在时返回 `RepositoryError::NotFound`
    pub async fn retry(&self, id: &str) -> Result<DeliveryTask, RepositoryError> {
        let dead_letter = self.get(id).await?;

        let task = self
            .tasks
            .create(&DeliveryTask::new(
                dead_letter.subscription_id.clone(),
                dead_letter.payload.clone(),
            ))
            .await?;

        self.dead_letters
            .update_status(
                id,
                DeadLetterStatus::Retried,
                Utc::now(),
                Some(RETRY_NOTE.to_string()),
            )
            .await?;

        info!("Dead letter {} requeued as delivery task {}", id, task.id);
        Ok(task)
    }

    /// 永久删除死信
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.dead_letters.delete(id).await
    }
}
