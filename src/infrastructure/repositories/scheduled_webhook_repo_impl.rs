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

use crate::domain::models::scheduled_webhook::{Recurrence, ScheduledStatus, ScheduledWebhook};
use crate::domain::repositories::delivery_task_repository::RepositoryError;
use crate::domain::repositories::scheduled_webhook_repository::ScheduledWebhookRepository;
use crate::infrastructure::database::entities::scheduled_webhook;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;

/// 定时投递仓库实现
#[derive(Clone)]
pub struct ScheduledWebhookRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl ScheduledWebhookRepoImpl {
    /// 创建新的定时投递仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScheduledWebhookRepository for ScheduledWebhookRepoImpl {
    async fn create(&self, entry: &ScheduledWebhook) -> Result<ScheduledWebhook, RepositoryError> {
        let active_model = scheduled_webhook::ActiveModel {
            id: Set(entry.id.clone()),
            subscription_id: Set(entry.subscription_id.clone()),
            payload: Set(entry.payload.clone()),
            scheduled_for: Set(entry.scheduled_for),
            recurrence: Set(entry.recurrence.to_string()),
            status: Set(entry.status.to_string()),
            created_at: Set(entry.created_at),
        };

        scheduled_webhook::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(entry.clone())
    }

    async fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledWebhook>, RepositoryError> {
        let models = scheduled_webhook::Entity::find()
            .filter(scheduled_webhook::Column::Status.eq(ScheduledStatus::Pending.to_string()))
            .filter(scheduled_webhook::Column::ScheduledFor.lte(now))
            .order_by_asc(scheduled_webhook::Column::ScheduledFor)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list(
        &self,
        subscription_id: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ScheduledWebhook>, RepositoryError> {
        let mut query = scheduled_webhook::Entity::find();
        if let Some(subscription_id) = subscription_id {
            query = query.filter(scheduled_webhook::Column::SubscriptionId.eq(subscription_id));
        }

        let models = query
            .order_by_desc(scheduled_webhook::Column::CreatedAt)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update_status(
        &self,
        id: &str,
        status: ScheduledStatus,
    ) -> Result<(), RepositoryError> {
        let mut active: scheduled_webhook::ActiveModel =
            scheduled_webhook::Entity::find_by_id(id.to_string())
                .one(self.db.as_ref())
                .await?
                .ok_or(RepositoryError::NotFound)?
                .into();

        active.status = Set(status.to_string());

        active.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = scheduled_webhook::Entity::delete_by_id(id.to_string())
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl From<scheduled_webhook::Model> for ScheduledWebhook {
    fn from(model: scheduled_webhook::Model) -> Self {
        Self {
            id: model.id,
            subscription_id: model.subscription_id,
            payload: model.payload,
            scheduled_for: model.scheduled_for,
            recurrence: Recurrence::from(model.recurrence),
            status: model.status.parse().unwrap_or_default(),
            created_at: model.created_at,
        }
    }
}
