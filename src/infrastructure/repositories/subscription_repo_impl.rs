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

use crate::domain::models::subscription::Subscription;
use crate::domain::repositories::delivery_task_repository::RepositoryError;
use crate::domain::repositories::subscription_repository::SubscriptionRepository;
use crate::infrastructure::database::entities::subscription;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;

/// 订阅仓库实现
#[derive(Clone)]
pub struct SubscriptionRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl SubscriptionRepoImpl {
    /// 创建新的订阅仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepoImpl {
    async fn create(&self, sub: &Subscription) -> Result<Subscription, RepositoryError> {
        let active_model = subscription::ActiveModel {
            id: Set(sub.id.clone()),
            target_url: Set(sub.target_url.clone()),
            secret: Set(sub.secret.clone()),
            event_types: Set(sub.event_types.clone()),
            created_at: Set(sub.created_at),
            updated_at: Set(sub.updated_at),
        };

        subscription::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(sub.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>, RepositoryError> {
        let model = subscription::Entity::find_by_id(id.to_string())
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Subscription>, RepositoryError> {
        let models = subscription::Entity::find()
            .order_by_desc(subscription::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, sub: &Subscription) -> Result<Subscription, RepositoryError> {
        let mut active: subscription::ActiveModel =
            subscription::Entity::find_by_id(sub.id.clone())
                .one(self.db.as_ref())
                .await?
                .ok_or(RepositoryError::NotFound)?
                .into();

        active.target_url = Set(sub.target_url.clone());
        active.secret = Set(sub.secret.clone());
        active.event_types = Set(sub.event_types.clone());
        active.updated_at = Set(sub.updated_at);

        let updated_model = active.update(self.db.as_ref()).await?;

        Ok(updated_model.into())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = subscription::Entity::delete_by_id(id.to_string())
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl From<subscription::Model> for Subscription {
    fn from(model: subscription::Model) -> Self {
        Self {
            id: model.id,
            target_url: model.target_url,
            secret: model.secret,
            event_types: model.event_types,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
