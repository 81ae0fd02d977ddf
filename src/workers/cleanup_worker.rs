// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CleanupSettings;
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 投递日志清理工作器
///
/// 负责定期删除超过保留期的投递日志
pub struct CleanupWorker {
    repository: Arc<dyn DeliveryLogRepository>,
    interval: Duration,
    retention: chrono::Duration,
}

impl CleanupWorker {
    pub fn new(repository: Arc<dyn DeliveryLogRepository>, settings: &CleanupSettings) -> Self {
        Self {
            repository,
            interval: settings.interval(),
            retention: settings.retention(),
        }
    }

    /// 删除早于保留期的日志，返回删除条数
    pub async fn cleanup_old_logs(&self) -> Result<u64, WorkerError> {
        let cutoff = Utc::now() - self.retention;
        let count = self.repository.delete_older_than(cutoff).await?;

        if count > 0 {
            info!("Cleaned up {} delivery logs older than {}", count, cutoff);
            counter!("delivery_logs_pruned_total").increment(count);
        }
        Ok(count)
    }
}

#[async_trait]
impl Worker for CleanupWorker {
    async fn run_once(&self) -> Result<(), WorkerError> {
        self.cleanup_old_logs().await.map(|_| ())
    }

    fn name(&self) -> &str {
        "cleanup worker"
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}

#[cfg(test)]
#[path = "cleanup_worker_test.rs"]
mod tests;
