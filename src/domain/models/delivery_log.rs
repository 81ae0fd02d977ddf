// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 投递日志实体
///
/// 记录一次投递尝试，只追加不修改，由清理工作器按保留期裁剪。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLog {
    pub id: String,
    pub delivery_task_id: String,
    pub subscription_id: String,
    /// 尝试时的目标URL快照
    pub target_url: String,
    pub timestamp: DateTime<Utc>,
    /// 尝试序号，从 1 开始
    pub attempt_number: i32,
    pub outcome: DeliveryOutcome,
    pub http_status: Option<i32>,
    pub error_details: Option<String>,
}

impl DeliveryLog {
    /// 为一次尝试创建日志记录
    pub fn for_attempt(
        delivery_task_id: &str,
        subscription_id: &str,
        target_url: &str,
        attempt_number: i32,
        result: &AttemptResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            delivery_task_id: delivery_task_id.to_string(),
            subscription_id: subscription_id.to_string(),
            target_url: target_url.to_string(),
            timestamp: Utc::now(),
            attempt_number,
            outcome: result.outcome,
            http_status: result.http_status,
            error_details: result.error.clone(),
        }
    }
}

/// 单次投递尝试的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptResult {
    pub outcome: DeliveryOutcome,
    pub http_status: Option<i32>,
    pub error: Option<String>,
}

impl AttemptResult {
    pub fn success(status: u16) -> Self {
        Self {
            outcome: DeliveryOutcome::Success,
            http_status: Some(status as i32),
            error: None,
        }
    }

    /// 非 2xx 响应
    pub fn rejected(status: u16, status_line: String) -> Self {
        Self {
            outcome: DeliveryOutcome::FailedAttempt,
            http_status: Some(status as i32),
            error: Some(status_line),
        }
    }

    /// 传输层错误（连接失败、超时等）
    pub fn transport_error(error: String) -> Self {
        Self {
            outcome: DeliveryOutcome::FailedAttempt,
            http_status: None,
            error: Some(error),
        }
    }
}

/// 投递尝试结果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// 收到 2xx 响应
    Success,
    /// 本次失败，仍可重试
    FailedAttempt,
    /// 终态失败
    Failure,
}

impl DeliveryOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, DeliveryOutcome::Success)
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeliveryOutcome::Success => write!(f, "success"),
            DeliveryOutcome::FailedAttempt => write!(f, "failed_attempt"),
            DeliveryOutcome::Failure => write!(f, "failure"),
        }
    }
}

impl FromStr for DeliveryOutcome {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(DeliveryOutcome::Success),
            "failed_attempt" => Ok(DeliveryOutcome::FailedAttempt),
            "failure" => Ok(DeliveryOutcome::Failure),
            _ => Err(()),
        }
    }
}
