// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// 固定退避表：第 N 次失败后的等待时间，超出表长度后使用 `TAIL_BACKOFF`
const BACKOFF_TABLE: [Duration; 4] = [
    Duration::from_secs(10),
    Duration::from_secs(30),
    Duration::from_secs(60),
    Duration::from_secs(5 * 60),
];

const TAIL_BACKOFF: Duration = Duration::from_secs(15 * 60);

/// 重试策略配置
///
/// 退避时间来自固定查表而不是指数计算：
/// 1 → 10s, 2 → 30s, 3 → 1min, 4 → 5min, ≥5 → 15min
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（含首次）
    pub max_attempts: i32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: i32) -> Self {
        Self { max_attempts }
    }

    /// 计算第 `attempt` 次尝试失败后的退避时间
    pub fn calculate_backoff(&self, attempt: i32) -> Duration {
        match attempt {
            n @ 1..=4 => BACKOFF_TABLE[(n - 1) as usize],
            _ => TAIL_BACKOFF,
        }
    }

    /// 计算下次重试时间
    pub fn next_retry_time(&self, attempt: i32, base_time: DateTime<Utc>) -> DateTime<Utc> {
        let backoff = self.calculate_backoff(attempt);
        base_time + chrono::Duration::seconds(backoff.as_secs() as i64)
    }

    /// 第 `attempt` 次尝试失败后是否还应重试
    pub fn should_retry(&self, attempt: i32) -> bool {
        attempt < self.max_attempts
    }
}
