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

use crate::config::settings::DeliverySettings;
use crate::domain::models::dead_letter::DeadLetterTask;
use crate::domain::models::delivery_log::{AttemptResult, DeliveryLog};
use crate::domain::models::delivery_task::{DeliveryStatus, DeliveryTask};
use crate::domain::repositories::dead_letter_repository::DeadLetterRepository;
use crate::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use crate::domain::repositories::delivery_task_repository::DeliveryTaskRepository;
use crate::domain::services::subscription_service::SubscriptionService;
use crate::utils::errors::WorkerError;
use crate::utils::retry_policy::RetryPolicy;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use metrics::{counter, histogram};
use reqwest::{header, Client};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 投递工作器
///
/// 每轮拉取可尝试的 pending 任务并逐个投递。单个任务内部的步骤严格有序：
/// 解析订阅 → HTTP投递 → 写日志 → 单次写入状态与下次尝试时间 → 必要时转入死信。
/// 订阅已不存在的任务直接置为 failed。任何一步的存储错误只记录日志，
/// 不影响同一轮中的其他任务。
pub struct DeliveryWorker {
    tasks: Arc<dyn DeliveryTaskRepository>,
    logs: Arc<dyn DeliveryLogRepository>,
    dead_letters: Arc<dyn DeadLetterRepository>,
    subscriptions: Arc<SubscriptionService>,
    /// HTTP客户端
    client: Client,
    settings: DeliverySettings,
    retry_policy: RetryPolicy,
}

impl DeliveryWorker {
    /// 创建新的投递工作器实例
    pub fn new(
        tasks: Arc<dyn DeliveryTaskRepository>,
        logs: Arc<dyn DeliveryLogRepository>,
        dead_letters: Arc<dyn DeadLetterRepository>,
        subscriptions: Arc<SubscriptionService>,
        settings: DeliverySettings,
    ) -> Result<Self, WorkerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("hookrelay/", env!("CARGO_PKG_VERSION"))),
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| WorkerError::InternalError(e.to_string()))?;

        Ok(Self {
            tasks,
            logs,
            dead_letters,
            subscriptions,
            client,
            retry_policy: RetryPolicy::new(settings.max_attempts),
            settings,
        })
    }

    /// 处理一轮待投递任务
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 本轮处理的任务数
    /// * `Err(WorkerError)` - 拉取任务失败
    pub async fn process_pending_deliveries(&self) -> Result<usize, WorkerError> {
        let tasks = self
            .tasks
            .find_eligible(Utc::now(), self.settings.batch_size)
            .await?;

        if tasks.is_empty() {
            return Ok(0);
        }

        let count = tasks.len();
        info!("Processing {} pending deliveries", count);

        futures::stream::iter(tasks)
            .for_each_concurrent(self.settings.concurrency.max(1), |task| async move {
                self.deliver(task).await;
            })
            .await;

        Ok(count)
    }

    async fn deliver(&self, task: DeliveryTask) {
        let subscription = match self.subscriptions.resolve(&task.subscription_id).await {
            Ok(Some(subscription)) => subscription,
            Ok(None) => {
                self.abandon_orphan(&task).await;
                return;
            }
            Err(e) => {
                error!(
                    "Error fetching subscription for task {}: {}",
                    task.id, e
                );
                return;
            }
        };

        let target_url = subscription.target_url;
        let result = self.attempt(&task, &target_url).await;
        let attempt = task.attempt_count + 1;

        let log = DeliveryLog::for_attempt(
            &task.id,
            &task.subscription_id,
            &target_url,
            attempt,
            &result,
        );
        if let Err(e) = self.logs.create(&log).await {
            error!("Error logging delivery attempt for task {}: {}", task.id, e);
        }

        let now = Utc::now();
        let status = DeliveryStatus::after_attempt(result.outcome, attempt, &self.retry_policy);
        let next_attempt_at = match status {
            DeliveryStatus::Pending => Some(self.retry_policy.next_retry_time(attempt, now)),
            DeliveryStatus::Delivered | DeliveryStatus::Failed => None,
        };

        if let Err(e) = self
            .tasks
            .record_attempt(&task.id, status, attempt, now, next_attempt_at)
            .await
        {
            error!("Error updating task status for {}: {}", task.id, e);
            return;
        }

        match (status, next_attempt_at) {
            (DeliveryStatus::Failed, _) => {
                let exhausted = DeliveryTask {
                    attempt_count: attempt,
                    ..task
                };
                self.promote_to_dead_letter(&exhausted, &target_url, result.error.as_deref())
                    .await;
            }
            (DeliveryStatus::Pending, Some(at)) => {
                debug!(
                    "Task {} will be retried at {} (attempt {})",
                    task.id, at, attempt
                );
            }
            _ => {}
        }
    }

    /// 订阅已被删除的任务永远无法投递，直接置为 failed，
    /// 使其离开待投递队列头部
    async fn abandon_orphan(&self, task: &DeliveryTask) {
        warn!(
            "Subscription {} for task {} no longer exists, marking task failed",
            task.subscription_id, task.id
        );
        counter!("delivery_failed_total", "reason" => "subscription_missing").increment(1);
        if let Err(e) = self
            .tasks
            .update_status(&task.id, DeliveryStatus::Failed)
            .await
        {
            error!("Error marking orphaned task {} failed: {}", task.id, e);
        }
    }

    /// 发起一次HTTP投递并分类结果
    async fn attempt(&self, task: &DeliveryTask, target_url: &str) -> AttemptResult {
        info!("Delivering task {} to {}", task.id, target_url);
        counter!("delivery_attempts_total").increment(1);

        let start = std::time::Instant::now();

        let response = self
            .client
            .post(target_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(task.payload.clone())
            .timeout(self.settings.request_timeout())
            .send()
            .await;

        histogram!("delivery_duration_seconds").record(start.elapsed().as_secs_f64());

        match response {
            Ok(resp) if resp.status().is_success() => {
                info!("Task {} delivered successfully", task.id);
                counter!("delivery_success_total").increment(1);
                AttemptResult::success(resp.status().as_u16())
            }
            Ok(resp) => {
                let status = resp.status();
                warn!("Task {} delivery failed with status: {}", task.id, status);
                counter!("delivery_failed_total", "reason" => "http_error").increment(1);
                AttemptResult::rejected(status.as_u16(), status.to_string())
            }
            Err(e) => {
                warn!("Task {} delivery failed with error: {}", task.id, e);
                let reason = if e.is_timeout() {
                    "timeout"
                } else {
                    "network_error"
                };
                counter!("delivery_failed_total", "reason" => reason).increment(1);
                AttemptResult::transport_error(e.to_string())
            }
        }
    }

    /// 尽力写入死信；失败不回滚任务的 failed 状态
    async fn promote_to_dead_letter(
        &self,
        task: &DeliveryTask,
        target_url: &str,
        error: Option<&str>,
    ) {
        let dead_letter = DeadLetterTask::from_exhausted(task, target_url, error);
        match self.dead_letters.create(&dead_letter).await {
            Ok(_) => {
                info!(
                    "Task {} moved to dead letter queue after {} attempts",
                    task.id, task.attempt_count
                );
                counter!("delivery_dead_letter_total").increment(1);
            }
            Err(e) => {
                warn!(
                    "Error inserting into dead letter queue for task {}: {}",
                    task.id, e
                );
            }
        }
    }
}

#[async_trait]
impl Worker for DeliveryWorker {
    async fn run_once(&self) -> Result<(), WorkerError> {
        self.process_pending_deliveries().await.map(|_| ())
    }

    fn name(&self) -> &str {
        "delivery worker"
    }

    fn interval(&self) -> Duration {
        self.settings.poll_interval()
    }
}
