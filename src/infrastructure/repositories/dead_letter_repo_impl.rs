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

use crate::domain::models::dead_letter::{DeadLetterStatus, DeadLetterTask};
use crate::domain::repositories::dead_letter_repository::DeadLetterRepository;
use crate::domain::repositories::delivery_task_repository::RepositoryError;
use crate::infrastructure::database::entities::dead_letter_task;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;

/// 死信仓库实现
#[derive(Clone)]
pub struct DeadLetterRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl DeadLetterRepoImpl {
    /// 创建新的死信仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeadLetterRepository for DeadLetterRepoImpl {
    async fn create(&self, task: &DeadLetterTask) -> Result<DeadLetterTask, RepositoryError> {
        let active_model = dead_letter_task::ActiveModel {
            id: Set(task.id.clone()),
            original_task_id: Set(task.original_task_id.clone()),
            subscription_id: Set(task.subscription_id.clone()),
            payload: Set(task.payload.clone()),
            target_url: Set(task.target_url.clone()),
            reason: Set(task.reason.clone()),
            attempt_count: Set(task.attempt_count),
            failed_at: Set(task.failed_at),
            last_attempt_at: Set(task.last_attempt_at),
            status: Set(task.status.to_string()),
            event_type: Set(task.event_type.clone()),
            error_details: Set(task.error_details.clone()),
        };

        dead_letter_task::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(task.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<DeadLetterTask>, RepositoryError> {
        let model = dead_letter_task::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn find_by_subscription(
        &self,
        subscription_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<DeadLetterTask>, RepositoryError> {
        let models = dead_letter_task::Entity::find()
            .filter(dead_letter_task::Column::SubscriptionId.eq(subscription_id))
            .order_by_desc(dead_letter_task::Column::FailedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_status(
        &self,
        id: &str,
        status: DeadLetterStatus,
        last_attempt_at: DateTime<Utc>,
        error_details: Option<String>,
    ) -> Result<(), RepositoryError> {
        let mut active: dead_letter_task::ActiveModel =
            dead_letter_task::Entity::find_by_id(id.to_string())
                .one(self.db.as_ref())
                .await?
                .ok_or(RepositoryError::NotFound)?
                .into();

        active.status = Set(status.to_string());
        active.last_attempt_at = Set(Some(last_attempt_at));
        if error_details.is_some() {
            active.error_details = Set(error_details);
        }

        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = dead_letter_task::Entity::delete_by_id(id.to_string())
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl From<dead_letter_task::Model> for DeadLetterTask {
    fn from(model: dead_letter_task::Model) -> Self {
        Self {
            id: model.id,
            original_task_id: model.original_task_id,
            subscription_id: model.subscription_id,
            payload: model.payload,
            target_url: model.target_url,
            reason: model.reason,
            attempt_count: model.attempt_count,
            failed_at: model.failed_at,
            last_attempt_at: model.last_attempt_at,
            status: model.status.parse().unwrap_or_default(),
            event_type: model.event_type,
            error_details: model.error_details,
        }
    }
}
