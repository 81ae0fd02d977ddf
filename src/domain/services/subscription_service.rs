// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::subscription::Subscription;
use crate::domain::repositories::delivery_task_repository::RepositoryError;
use crate::domain::repositories::subscription_repository::SubscriptionRepository;
use crate::infrastructure::cache::subscription_cache::SubscriptionCache;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// 订阅更新内容
///
/// 字段为 `None` 表示保持原值；`Some("")` 表示清空可选字段
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub target_url: Option<String>,
    pub secret: Option<String>,
    pub event_types: Option<String>,
}

/// 订阅服务
///
/// 仓库是系统记录，缓存只在读取路径上加速。所有修改和删除都会使缓存条目失效，
/// 保证旧的目标地址、密钥和事件过滤不会超过一个TTL窗口继续生效。
pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepository>,
    cache: Arc<dyn SubscriptionCache>,
}

impl SubscriptionService {
    /// 创建新的订阅服务实例
    pub fn new(
        repository: Arc<dyn SubscriptionRepository>,
        cache: Arc<dyn SubscriptionCache>,
    ) -> Self {
        Self { repository, cache }
    }

    /// 读穿透查找订阅
    ///
    /// 缓存命中直接返回；未命中时查询仓库并回填缓存
    pub async fn resolve(&self, id: &str) -> Result<Option<Subscription>, RepositoryError> {
        if let Some(subscription) = self.cache.get(id).await {
            return Ok(Some(subscription));
        }

        let subscription = self.repository.find_by_id(id).await?;
        if let Some(ref subscription) = subscription {
            debug!("Subscription {} loaded from store", id);
            self.cache.set(id, subscription).await;
        }
        Ok(subscription)
    }

    /// 创建订阅
    pub async fn create(&self, subscription: Subscription) -> Result<Subscription, RepositoryError> {
        self.repository.create(&subscription).await
    }

    /// 直接从仓库读取订阅，不经过缓存
    pub async fn get(&self, id: &str) -> Result<Subscription, RepositoryError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// 列出全部订阅
    pub async fn list(&self) -> Result<Vec<Subscription>, RepositoryError> {
        self.repository.list().await
    }

    /// 更新订阅并使缓存失效
    pub async fn update(
        &self,
        id: &str,
        changes: SubscriptionUpdate,
    ) -> Result<Subscription, RepositoryError> {
        let mut subscription = self.get(id).await?;

        if let Some(target_url) = changes.target_url {
            subscription.target_url = target_url;
        }
        if let Some(secret) = changes.secret {
            subscription.secret = Some(secret).filter(|s| !s.is_empty());
        }
        if let Some(event_types) = changes.event_types {
            subscription.event_types = Some(event_types).filter(|s| !s.trim().is_empty());
        }
        subscription.updated_at = Utc::now();

        let updated = self.repository.update(&subscription).await;
        // 无论写入是否成功都失效，避免缓存与存储分歧
        self.cache.delete(id).await;
        updated
    }

    /// 删除订阅并使缓存失效
    pub async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = self.repository.delete(id).await;
        self.cache.delete(id).await;
        result
    }
}

#[cfg(test)]
#[path = "subscription_service_test.rs"]
mod tests;
