// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::delivery_task::{DeliveryStatus, DeliveryTask};
use crate::domain::repositories::delivery_task_repository::{
    DeliveryTaskRepository, RepositoryError,
};
use crate::infrastructure::database::entities::delivery_task;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;

/// 投递任务仓库实现
#[derive(Clone)]
pub struct DeliveryTaskRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl DeliveryTaskRepoImpl {
    /// 创建新的投递任务仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_active(&self, id: &str) -> Result<delivery_task::ActiveModel, RepositoryError> {
        Ok(delivery_task::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into())
    }
}

#[async_trait]
impl DeliveryTaskRepository for DeliveryTaskRepoImpl {
    async fn create(&self, task: &DeliveryTask) -> Result<DeliveryTask, RepositoryError> {
        let active_model = delivery_task::ActiveModel {
            id: Set(task.id.clone()),
            subscription_id: Set(task.subscription_id.clone()),
            payload: Set(task.payload.clone()),
            status: Set(task.status.to_string()),
            attempt_count: Set(task.attempt_count),
            last_attempt_at: Set(task.last_attempt_at),
            next_attempt_at: Set(task.next_attempt_at),
            created_at: Set(task.created_at),
        };

        delivery_task::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(task.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<DeliveryTask>, RepositoryError> {
        let model = delivery_task::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_eligible(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<DeliveryTask>, RepositoryError> {
        let models = delivery_task::Entity::find()
            .filter(delivery_task::Column::Status.eq(DeliveryStatus::Pending.to_string()))
            .filter(
                Condition::any()
                    .add(delivery_task::Column::NextAttemptAt.is_null())
                    .add(delivery_task::Column::NextAttemptAt.lte(now)),
            )
            .order_by_asc(delivery_task::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn record_attempt(
        &self,
        id: &str,
        status: DeliveryStatus,
        attempt_count: i32,
        last_attempt_at: DateTime<Utc>,
        next_attempt_at: Option<DateTime<Utc>>,
    ) -> Result<(), RepositoryError> {
        let mut active = self.find_active(id).await?;

        active.status = Set(status.to_string());
        active.attempt_count = Set(attempt_count);
        active.last_attempt_at = Set(Some(last_attempt_at));
        active.next_attempt_at = Set(next_attempt_at);

        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn update_status(
        &self,
        id: &str,
        status: DeliveryStatus,
    ) -> Result<(), RepositoryError> {
        let mut active = self.find_active(id).await?;

        active.status = Set(status.to_string());

        active.update(self.db.as_ref()).await?;
        Ok(())
    }
}

impl From<delivery_task::Model> for DeliveryTask {
    fn from(model: delivery_task::Model) -> Self {
        Self {
            id: model.id,
            subscription_id: model.subscription_id,
            payload: model.payload,
            status: model.status.parse().unwrap_or_default(),
            attempt_count: model.attempt_count,
            last_attempt_at: model.last_attempt_at,
            next_attempt_at: model.next_attempt_at,
            created_at: model.created_at,
        }
    }
}
