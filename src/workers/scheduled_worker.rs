// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SchedulerSettings;
use crate::domain::models::delivery_task::DeliveryTask;
use crate::domain::models::scheduled_webhook::{Recurrence, ScheduledStatus, ScheduledWebhook};
use crate::domain::repositories::delivery_task_repository::DeliveryTaskRepository;
use crate::domain::repositories::scheduled_webhook_repository::ScheduledWebhookRepository;
use crate::utils::errors::WorkerError;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 定时投递工作器
///
/// 把到期的定时条目物化为投递任务。任务创建失败的条目标记为 failed，
/// 不重试也不生成后继；周期条目在成功后追加一行后继记录。
pub struct ScheduledWorker {
    entries: Arc<dyn ScheduledWebhookRepository>,
    tasks: Arc<dyn DeliveryTaskRepository>,
    interval: Duration,
}

impl ScheduledWorker {
    pub fn new(
        entries: Arc<dyn ScheduledWebhookRepository>,
        tasks: Arc<dyn DeliveryTaskRepository>,
        settings: &SchedulerSettings,
    ) -> Self {
        Self {
            entries,
            tasks,
            interval: settings.poll_interval(),
        }
    }

    /// 处理所有已到期的条目，返回成功物化的数量
    pub async fn process_due_entries(&self) -> Result<usize, WorkerError> {
        let now = Utc::now();
        let due = self.entries.find_due(now).await?;

        if due.is_empty() {
            return Ok(0);
        }
        info!("Found {} due scheduled webhooks", due.len());

        let mut materialized = 0;
        for entry in due {
            if self.materialize(&entry, now).await {
                materialized += 1;
            }
        }
        Ok(materialized)
    }

    async fn materialize(&self, entry: &ScheduledWebhook, now: DateTime<Utc>) -> bool {
        let task = DeliveryTask::new(entry.subscription_id.clone(), entry.payload.clone());
        if let Err(e) = self.tasks.create(&task).await {
            error!(
                "Failed to create delivery task for scheduled webhook {}: {}",
                entry.id, e
            );
            self.set_status(entry, ScheduledStatus::Failed).await;
            return false;
        }

        self.set_status(entry, ScheduledStatus::Delivered).await;
        counter!("scheduled_materialized_total").increment(1);

        if let Recurrence::Unknown(rule) = &entry.recurrence {
            warn!(
                "Unknown recurrence type '{}' on scheduled webhook {}, treating as 'none'",
                rule, entry.id
            );
        }

        if let Some(successor) = entry.successor(now) {
            match self.entries.create(&successor).await {
                Ok(_) => info!(
                    "Scheduled next {} occurrence of {} at {}",
                    entry.recurrence, entry.id, successor.scheduled_for
                ),
                Err(e) => error!(
                    "Failed to schedule next occurrence of {}: {}",
                    entry.id, e
                ),
            }
        }
        true
    }

    async fn set_status(&self, entry: &ScheduledWebhook, status: ScheduledStatus) {
        if let Err(e) = self.entries.update_status(&entry.id, status).await {
            error!(
                "Failed to mark scheduled webhook {} as {}: {}",
                entry.id, status, e
            );
        }
    }
}

#[async_trait]
impl Worker for ScheduledWorker {
    async fn run_once(&self) -> Result<(), WorkerError> {
        self.process_due_entries().await.map(|_| ())
    }

    fn name(&self) -> &str {
        "scheduled worker"
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}
