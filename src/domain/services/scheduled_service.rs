// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scheduled_webhook::{Recurrence, ScheduledWebhook};
use crate::domain::repositories::delivery_task_repository::RepositoryError;
use crate::domain::repositories::scheduled_webhook_repository::ScheduledWebhookRepository;
use crate::domain::services::subscription_service::SubscriptionService;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// 定时投递列表分页大小
pub const SCHEDULED_PAGE_SIZE: u64 = 50;

/// 定时投递服务
pub struct ScheduledService {
    entries: Arc<dyn ScheduledWebhookRepository>,
    subscriptions: Arc<SubscriptionService>,
}

impl ScheduledService {
    pub fn new(
        entries: Arc<dyn ScheduledWebhookRepository>,
        subscriptions: Arc<SubscriptionService>,
    ) -> Self {
        Self {
            entries,
            subscriptions,
        }
    }

    /// 创建定时投递
    ///
    /// 订阅不存在时返回 `RepositoryError::NotFound`
    pub async fn create(
        &self,
        subscription_id: &str,
        payload: String,
        scheduled_for: DateTime<Utc>,
        recurrence: Recurrence,
    ) -> Result<ScheduledWebhook, RepositoryError> {
        if self.subscriptions.resolve(subscription_id).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let entry = ScheduledWebhook::new(subscription_id, payload, scheduled_for, recurrence);
        self.entries.create(&entry).await
    }

    /// 列出定时投递，最新创建的在前
    pub async fn list(
        &self,
        subscription_id: Option<&str>,
        page: u64,
    ) -> Result<Vec<ScheduledWebhook>, RepositoryError> {
        let offset = page.saturating_sub(1) * SCHEDULED_PAGE_SIZE;
        self.entries
            .list(subscription_id, SCHEDULED_PAGE_SIZE, offset)
            .await
    }

    /// 删除定时投递
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.entries.delete(id).await
    }
}
