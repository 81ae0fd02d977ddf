// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::delivery_task::DeliveryTask;

/// 死信任务实体
///
/// 重试耗尽的投递任务在此留存快照，可由死信管理器重新入队或删除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadLetterTask {
    /// 死信唯一标识符
    pub id: String,
    /// 原投递任务ID
    pub original_task_id: String,
    /// 所属订阅ID
    pub subscription_id: String,
    /// 负载快照
    pub payload: String,
    /// 目标URL快照
    pub target_url: Option<String>,
    /// 失败原因
    pub reason: String,
    /// 提升为死信时的尝试次数
    pub attempt_count: i32,
    /// 进入死信的时间
    pub failed_at: DateTime<Utc>,
    /// 最近一次尝试时间（重新入队时更新）
    pub last_attempt_at: Option<DateTime<Utc>>,
    /// 死信状态
    pub status: DeadLetterStatus,
    /// 事件类型
    pub event_type: Option<String>,
    /// 错误详情
    pub error_details: Option<String>,
}

impl DeadLetterTask {
    /// 从重试耗尽的投递任务生成死信快照
    ///
    /// # 参数
    ///
    /// * `task` - 已进入 failed 状态的投递任务
    /// * `target_url` - 最后一次尝试使用的目标URL
    /// * `error` - 最后一次尝试的错误信息
    pub fn from_exhausted(task: &DeliveryTask, target_url: &str, error: Option<&str>) -> Self {
        let now = Utc::now();
        let error = error.filter(|e| !e.is_empty());
        Self {
            id: Uuid::new_v4().to_string(),
            original_task_id: task.id.clone(),
            subscription_id: task.subscription_id.clone(),
            payload: task.payload.clone(),
            target_url: Some(target_url.to_string()).filter(|u| !u.is_empty()),
            reason: error.unwrap_or_default().to_string(),
            attempt_count: task.attempt_count,
            failed_at: now,
            last_attempt_at: Some(now),
            status: DeadLetterStatus::Pending,
            event_type: None,
            error_details: error.map(str::to_string),
        }
    }
}

/// 死信状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeadLetterStatus {
    /// 等待人工处理
    #[default]
    Pending,
    /// 已重新入队
    Retried,
}

impl fmt::Display for DeadLetterStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeadLetterStatus::Pending => write!(f, "pending"),
            DeadLetterStatus::Retried => write!(f, "retried"),
        }
    }
}

impl FromStr for DeadLetterStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DeadLetterStatus::Pending),
            "retried" => Ok(DeadLetterStatus::Retried),
            _ => Err(()),
        }
    }
}
