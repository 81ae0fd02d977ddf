// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::delivery_task_repository::RepositoryError;
use crate::domain::models::subscription::Subscription;
use async_trait::async_trait;

/// 订阅仓库特质
///
/// 订阅数据的系统记录；缓存只是它前面的加速层
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// 创建订阅
    async fn create(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError>;
    /// 根据ID查找订阅
    async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>, RepositoryError>;
    /// 列出全部订阅
    async fn list(&self) -> Result<Vec<Subscription>, RepositoryError>;
    /// 更新订阅
    async fn update(&self, subscription: &Subscription) -> Result<Subscription, RepositoryError>;
    /// 删除订阅
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
}
