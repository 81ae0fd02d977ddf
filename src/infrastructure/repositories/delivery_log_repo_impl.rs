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

use crate::domain::models::delivery_log::{DeliveryLog, DeliveryOutcome};
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::domain::repositories::delivery_task_repository::RepositoryError;
use crate::infrastructure::database::entities::delivery_log;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;

/// 投递日志仓库实现
#[derive(Clone)]
pub struct DeliveryLogRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl DeliveryLogRepoImpl {
    /// 创建新的投递日志仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeliveryLogRepository for DeliveryLogRepoImpl {
    async fn create(&self, log: &DeliveryLog) -> Result<DeliveryLog, RepositoryError> {
        let active_model = delivery_log::ActiveModel {
            id: Set(log.id.clone()),
            delivery_task_id: Set(log.delivery_task_id.clone()),
            subscription_id: Set(log.subscription_id.clone()),
            target_url: Set(log.target_url.clone()),
            timestamp: Set(log.timestamp),
            attempt_number: Set(log.attempt_number),
            outcome: Set(log.outcome.to_string()),
            http_status: Set(log.http_status),
            error_details: Set(log.error_details.clone()),
        };

        delivery_log::Entity::insert(active_model)
            .exec(self.db.as_ref())
            .await?;

        Ok(log.clone())
    }

    async fn find_by_task(&self, task_id: &str) -> Result<Vec<DeliveryLog>, RepositoryError> {
        let models = delivery_log::Entity::find()
            .filter(delivery_log::Column::DeliveryTaskId.eq(task_id))
            .order_by_asc(delivery_log::Column::AttemptNumber)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_recent_by_subscription(
        &self,
        subscription_id: &str,
        limit: u64,
    ) -> Result<Vec<DeliveryLog>, RepositoryError> {
        let models = delivery_log::Entity::find()
            .filter(delivery_log::Column::SubscriptionId.eq(subscription_id))
            .order_by_desc(delivery_log::Column::Timestamp)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = delivery_log::Entity::delete_many()
            .filter(delivery_log::Column::Timestamp.lt(cutoff))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}

impl From<delivery_log::Model> for DeliveryLog {
    fn from(model: delivery_log::Model) -> Self {
        Self {
            id: model.id,
            delivery_task_id: model.delivery_task_id,
            subscription_id: model.subscription_id,
            target_url: model.target_url,
            timestamp: model.timestamp,
            attempt_number: model.attempt_number,
            // 未知取值按失败尝试处理
            outcome: model
                .outcome
                .parse()
                .unwrap_or(DeliveryOutcome::FailedAttempt),
            http_status: model.http_status,
            error_details: model.error_details,
        }
    }
}
