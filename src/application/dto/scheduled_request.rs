// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建定时投递请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateScheduledRequestDto {
    /// 所属订阅ID
    #[validate(length(min = 1))]
    pub subscription_id: String,

    /// 投递负载
    #[validate(length(min = 1))]
    pub payload: String,

    /// 计划投递时间
    pub scheduled_for: DateTime<Utc>,

    /// 重复规则：none / daily / weekly / monthly，缺省为 none
    pub recurrence: Option<String>,
}

/// 定时投递列表查询参数
#[derive(Debug, Default, Deserialize)]
pub struct ScheduledQueryDto {
    pub subscription_id: Option<String>,
    pub page: Option<u64>,
}

/// 分页查询参数
#[derive(Debug, Default, Deserialize)]
pub struct PageQueryDto {
    pub page: Option<u64>,
}
