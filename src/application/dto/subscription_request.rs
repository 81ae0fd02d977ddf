// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::subscription_service::SubscriptionUpdate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 创建订阅请求DTO
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateSubscriptionRequestDto {
    /// 投递目标URL
    #[validate(url)]
    pub target_url: String,

    /// 共享密钥
    #[validate(length(max = 256))]
    pub secret: Option<String>,

    /// 允许的事件类型（逗号分隔）
    pub event_types: Option<String>,
}

/// 更新订阅请求DTO，缺省字段保持原值
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateSubscriptionRequestDto {
    #[validate(url)]
    pub target_url: Option<String>,

    #[validate(length(max = 256))]
    pub secret: Option<String>,

    pub event_types: Option<String>,
}

impl From<UpdateSubscriptionRequestDto> for SubscriptionUpdate {
    fn from(dto: UpdateSubscriptionRequestDto) -> Self {
        Self {
            target_url: dto.target_url,
            secret: dto.secret,
            event_types: dto.event_types,
        }
    }
}
