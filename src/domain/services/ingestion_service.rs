// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::delivery_task::DeliveryTask;
use crate::domain::repositories::delivery_task_repository::{
    DeliveryTaskRepository, RepositoryError,
};
use crate::domain::services::subscription_service::SubscriptionService;
use crate::utils::signature;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// 入站请求被拒绝的原因
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("subscription not found")]
    SubscriptionNotFound,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("payload is not valid UTF-8")]
    InvalidPayload,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 入站处理结果
#[derive(Debug)]
pub enum IngestOutcome {
    /// 已入队
    Queued(DeliveryTask),
    /// 事件类型不在白名单内，静默丢弃
    Filtered,
}

/// 入站服务
///
/// 决定一个入站负载是否进入投递队列：先按事件类型过滤，再校验签名，
/// 最后创建一条 pending 投递任务。
pub struct IngestionService {
    subscriptions: Arc<SubscriptionService>,
    tasks: Arc<dyn DeliveryTaskRepository>,
}

impl IngestionService {
    pub fn new(
        subscriptions: Arc<SubscriptionService>,
        tasks: Arc<dyn DeliveryTaskRepository>,
    ) -> Self {
        Self {
            subscriptions,
            tasks,
        }
    }

    /// 处理一个入站负载
    ///
    /// # 参数
    ///
    /// * `subscription_id` - 目标订阅
    /// * `body` - 原始负载字节，签名基于它计算
    /// * `event_type` - 可选的事件类型
    /// * `signature` - 可选的 `sha256=<hex>` 签名
    pub async fn ingest(
        &self,
        subscription_id: &str,
        body: &[u8],
        event_type: Option<&str>,
        signature: Option<&str>,
    ) -> Result<IngestOutcome, IngestionError> {
        let subscription = self
            .subscriptions
            .resolve(subscription_id)
            .await?
            .ok_or(IngestionError::SubscriptionNotFound)?;

        if !subscription.allows_event(event_type) {
            debug!(
                "Dropping event {:?} for subscription {}: not in allow-list",
                event_type, subscription_id
            );
            return Ok(IngestOutcome::Filtered);
        }

        if let Some(secret) = subscription.signing_secret() {
            let valid = signature
                .map(|sig| signature::verify(body, secret, sig))
                .unwrap_or(false);
            if !valid {
                return Err(IngestionError::InvalidSignature);
            }
        }

        let payload =
            String::from_utf8(body.to_vec()).map_err(|_| IngestionError::InvalidPayload)?;
        let task = self
            .tasks
            .create(&DeliveryTask::new(subscription.id, payload))
            .await?;

        info!(
            "Queued delivery task {} for subscription {}",
            task.id, task.subscription_id
        );
        Ok(IngestOutcome::Queued(task))
    }
}
