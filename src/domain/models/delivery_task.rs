// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::delivery_log::DeliveryOutcome;
use crate::utils::retry_policy::RetryPolicy;

/// 投递任务实体
///
/// 表示一次待投递的负载及其所有投递尝试。任务只由投递工作器修改，
/// 终态（delivered / failed）保留用于审计。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTask {
    /// 任务唯一标识符
    pub id: String,
    /// 所属订阅ID
    pub subscription_id: String,
    /// 原始负载，不做解析
    pub payload: String,
    /// 任务状态
    pub status: DeliveryStatus,
    /// 已尝试次数
    pub attempt_count: i32,
    /// 最近一次尝试时间
    pub last_attempt_at: Option<DateTime<Utc>>,
    /// 下次允许尝试的时间，用于退避
    pub next_attempt_at: Option<DateTime<Utc>>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl DeliveryTask {
    /// 创建一个新的待投递任务
    ///
    /// # 参数
    ///
    /// * `subscription_id` - 所属订阅ID
    /// * `payload` - 负载
    ///
    /// # 返回值
    ///
    /// 返回状态为 pending、尝试次数为 0 的新任务
    pub fn new(subscription_id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subscription_id: subscription_id.into(),
            payload: payload.into(),
            status: DeliveryStatus::Pending,
            attempt_count: 0,
            last_attempt_at: None,
            next_attempt_at: None,
            created_at: Utc::now(),
        }
    }
}

/// 投递任务状态
///
/// 状态转换遵循以下流程：
/// Pending → Delivered / Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// 待投递
    #[default]
    Pending,
    /// 已投递
    Delivered,
    /// 重试耗尽
    Failed,
}

impl DeliveryStatus {
    /// 根据本次尝试结果计算新状态
    ///
    /// 成功即 delivered；未成功且策略不再允许重试为 failed；否则保持 pending。
    pub fn after_attempt(outcome: DeliveryOutcome, attempt: i32, policy: &RetryPolicy) -> Self {
        if outcome.is_success() {
            DeliveryStatus::Delivered
        } else if policy.should_retry(attempt) {
            DeliveryStatus::Pending
        } else {
            DeliveryStatus::Failed
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Delivered => write!(f, "delivered"),
            DeliveryStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DeliveryStatus::Pending),
            "delivered" => Ok(DeliveryStatus::Delivered),
            "failed" => Ok(DeliveryStatus::Failed),
            _ => Err(()),
        }
    }
}
