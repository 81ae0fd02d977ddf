// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 定时投递实体
///
/// 到期后由定时工作器物化为投递任务。周期性条目每次处理后追加一行
/// 后继记录，原记录保留作为历史。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledWebhook {
    /// 唯一标识符
    pub id: String,
    /// 所属订阅ID
    pub subscription_id: String,
    /// 负载
    pub payload: String,
    /// 计划投递时间
    pub scheduled_for: DateTime<Utc>,
    /// 重复规则
    pub recurrence: Recurrence,
    /// 状态
    pub status: ScheduledStatus,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl ScheduledWebhook {
    /// 创建一个新的定时投递
    ///
    /// # 参数
    ///
    /// * `subscription_id` - 所属订阅ID
    /// * `payload` - 负载
    /// * `scheduled_for` - 计划投递时间
    /// * `recurrence` - 重复规则
    pub fn new(
        subscription_id: impl Into<String>,
        payload: impl Into<String>,
        scheduled_for: DateTime<Utc>,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subscription_id: subscription_id.into(),
            payload: payload.into(),
            scheduled_for,
            recurrence,
            status: ScheduledStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// 生成下一次出现的后继记录
    ///
    /// 下一次时间从原计划时间推算；仅当其严格晚于 `now` 时才生成。
    pub fn successor(&self, now: DateTime<Utc>) -> Option<ScheduledWebhook> {
        let next = self.recurrence.next_occurrence(self.scheduled_for)?;
        if next <= now {
            return None;
        }
        Some(ScheduledWebhook::new(
            self.subscription_id.clone(),
            self.payload.clone(),
            next,
            self.recurrence.clone(),
        ))
    }
}

/// 重复规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum Recurrence {
    /// 只投递一次
    #[default]
    None,
    Daily,
    Weekly,
    /// 按自然月递增，月末日期取目标月最后一天
    Monthly,
    /// 无法识别的规则，按不重复处理
    Unknown(String),
}

impl Recurrence {
    /// 计算下一次出现时间
    ///
    /// 不重复或无法识别的规则返回 `None`。
    pub fn next_occurrence(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Recurrence::Daily => Some(from + Duration::days(1)),
            Recurrence::Weekly => Some(from + Duration::days(7)),
            Recurrence::Monthly => from.checked_add_months(Months::new(1)),
            Recurrence::None | Recurrence::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::None => write!(f, "none"),
            Recurrence::Daily => write!(f, "daily"),
            Recurrence::Weekly => write!(f, "weekly"),
            Recurrence::Monthly => write!(f, "monthly"),
            Recurrence::Unknown(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Recurrence {
    fn from(s: &str) -> Self {
        match s.trim() {
            "" | "none" => Recurrence::None,
            "daily" => Recurrence::Daily,
            "weekly" => Recurrence::Weekly,
            "monthly" => Recurrence::Monthly,
            other => Recurrence::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Recurrence {
    fn from(s: String) -> Self {
        Recurrence::from(s.as_str())
    }
}

impl From<Recurrence> for String {
    fn from(r: Recurrence) -> Self {
        r.to_string()
    }
}

/// 定时投递状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledStatus {
    /// 等待到期
    #[default]
    Pending,
    /// 已物化为投递任务
    Delivered,
    /// 物化失败
    Failed,
}

impl fmt::Display for ScheduledStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScheduledStatus::Pending => write!(f, "pending"),
            ScheduledStatus::Delivered => write!(f, "delivered"),
            ScheduledStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ScheduledStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ScheduledStatus::Pending),
            "delivered" => Ok(ScheduledStatus::Delivered),
            "failed" => Ok(ScheduledStatus::Failed),
            _ => Err(()),
        }
    }
}
