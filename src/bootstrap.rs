// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{CacheBackend, Settings};
use crate::domain::repositories::dead_letter_repository::DeadLetterRepository;
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::domain::repositories::delivery_task_repository::DeliveryTaskRepository;
use crate::domain::repositories::scheduled_webhook_repository::ScheduledWebhookRepository;
use crate::domain::services::dead_letter_service::DeadLetterService;
use crate::domain::services::delivery_query_service::DeliveryQueryService;
use crate::domain::services::ingestion_service::IngestionService;
use crate::domain::services::scheduled_service::ScheduledService;
use crate::domain::services::subscription_service::SubscriptionService;
use crate::infrastructure::cache::redis_client::RedisClient;
use crate::infrastructure::cache::subscription_cache::{
    MemorySubscriptionCache, RedisSubscriptionCache, SubscriptionCache,
};
use crate::infrastructure::repositories::dead_letter_repo_impl::DeadLetterRepoImpl;
use crate::infrastructure::repositories::delivery_log_repo_impl::DeliveryLogRepoImpl;
use crate::infrastructure::repositories::delivery_task_repo_impl::DeliveryTaskRepoImpl;
use crate::infrastructure::repositories::scheduled_webhook_repo_impl::ScheduledWebhookRepoImpl;
use crate::infrastructure::repositories::subscription_repo_impl::SubscriptionRepoImpl;
use crate::presentation::routes;
use crate::utils::errors::WorkerError;
use crate::workers::cleanup_worker::CleanupWorker;
use crate::workers::delivery_worker::DeliveryWorker;
use crate::workers::manager::WorkerManager;
use crate::workers::scheduled_worker::ScheduledWorker;
use anyhow::Context;
use axum::{Extension, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 根据配置选择订阅缓存后端
pub fn build_cache(settings: &Settings) -> anyhow::Result<Arc<dyn SubscriptionCache>> {
    let ttl = settings.cache.ttl();
    match settings.cache.backend {
        CacheBackend::Memory => {
            info!("Using in-process subscription cache (ttl {:?})", ttl);
            Ok(Arc::new(MemorySubscriptionCache::new(ttl)))
        }
        CacheBackend::Redis => {
            let url = settings
                .redis
                .url
                .as_deref()
                .context("cache.backend is redis but redis.url is not set")?;
            let client = Arc::new(RedisClient::new(url, settings.redis.timeout())?);
            info!("Using Redis subscription cache (ttl {:?})", ttl);
            Ok(Arc::new(RedisSubscriptionCache::new(client, ttl)))
        }
    }
}

/// 进程级组件
///
/// 数据库连接与缓存在此构造一次，注入到所有服务、处理器和工作器
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub tasks: Arc<dyn DeliveryTaskRepository>,
    pub logs: Arc<dyn DeliveryLogRepository>,
    pub dead_letter_repo: Arc<dyn DeadLetterRepository>,
    pub scheduled_repo: Arc<dyn ScheduledWebhookRepository>,
    pub subscriptions: Arc<SubscriptionService>,
    pub ingestion: Arc<IngestionService>,
    pub dead_letters: Arc<DeadLetterService>,
    pub scheduled: Arc<ScheduledService>,
    pub deliveries: Arc<DeliveryQueryService>,
}

impl AppContext {
    pub fn new(
        db: Arc<DatabaseConnection>,
        cache: Arc<dyn SubscriptionCache>,
        settings: Arc<Settings>,
    ) -> Self {
        let tasks: Arc<dyn DeliveryTaskRepository> =
            Arc::new(DeliveryTaskRepoImpl::new(db.clone()));
        let logs: Arc<dyn DeliveryLogRepository> = Arc::new(DeliveryLogRepoImpl::new(db.clone()));
        let dead_letter_repo: Arc<dyn DeadLetterRepository> =
            Arc::new(DeadLetterRepoImpl::new(db.clone()));
        let scheduled_repo: Arc<dyn ScheduledWebhookRepository> =
            Arc::new(ScheduledWebhookRepoImpl::new(db.clone()));

        let subscriptions = Arc::new(SubscriptionService::new(
            Arc::new(SubscriptionRepoImpl::new(db)),
            cache,
        ));
        let ingestion = Arc::new(IngestionService::new(subscriptions.clone(), tasks.clone()));
        let dead_letters = Arc::new(DeadLetterService::new(
            dead_letter_repo.clone(),
            tasks.clone(),
        ));
        let scheduled = Arc::new(ScheduledService::new(
            scheduled_repo.clone(),
            subscriptions.clone(),
        ));
        let deliveries = Arc::new(DeliveryQueryService::new(tasks.clone(), logs.clone()));

        Self {
            settings,
            tasks,
            logs,
            dead_letter_repo,
            scheduled_repo,
            subscriptions,
            ingestion,
            dead_letters,
            scheduled,
            deliveries,
        }
    }

    /// 组装HTTP路由
    pub fn router(&self) -> Router {
        routes::routes()
            .layer(Extension(self.subscriptions.clone()))
            .layer(Extension(self.ingestion.clone()))
            .layer(Extension(self.dead_letters.clone()))
            .layer(Extension(self.scheduled.clone()))
            .layer(Extension(self.deliveries.clone()))
            .layer(TraceLayer::new_for_http())
    }

    /// 投递工作器
    pub fn delivery_worker(&self) -> Result<DeliveryWorker, WorkerError> {
        DeliveryWorker::new(
            self.tasks.clone(),
            self.logs.clone(),
            self.dead_letter_repo.clone(),
            self.subscriptions.clone(),
            self.settings.delivery.clone(),
        )
    }

    /// 定时投递工作器
    pub fn scheduled_worker(&self) -> ScheduledWorker {
        ScheduledWorker::new(
            self.scheduled_repo.clone(),
            self.tasks.clone(),
            &self.settings.scheduler,
        )
    }

    /// 日志清理工作器
    pub fn cleanup_worker(&self) -> CleanupWorker {
        CleanupWorker::new(self.logs.clone(), &self.settings.cleanup)
    }

    /// 启动全部后台工作器
    pub fn start_workers(&self, manager: &mut WorkerManager) -> Result<(), WorkerError> {
        manager.spawn(Arc::new(self.delivery_worker()?));
        manager.spawn(Arc::new(self.scheduled_worker()));
        manager.spawn(Arc::new(self.cleanup_worker()));
        info!("Started {} background workers", manager.len());
        Ok(())
    }
}
