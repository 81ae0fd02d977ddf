// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 订阅实体
///
/// 表示一个已注册的事件订阅者，包含投递目标地址、
/// 可选的签名密钥以及可选的事件类型白名单。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// 订阅唯一标识符
    pub id: String,
    /// 投递目标URL
    pub target_url: String,
    /// 共享密钥，用于入站请求签名校验
    pub secret: Option<String>,
    /// 允许的事件类型，逗号分隔；为空表示允许全部
    pub event_types: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// 创建一个新的订阅
    ///
    /// # 参数
    ///
    /// * `target_url` - 投递目标URL
    /// * `secret` - 可选的共享密钥
    /// * `event_types` - 可选的事件类型白名单（逗号分隔）
    ///
    /// # 返回值
    ///
    /// 返回一个新的订阅实例，包含生成的唯一ID和当前时间戳
    pub fn new(target_url: String, secret: Option<String>, event_types: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            target_url,
            secret: secret.filter(|s| !s.is_empty()),
            event_types: event_types.filter(|s| !s.trim().is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    /// 签名密钥（忽略空字符串）
    pub fn signing_secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }

    /// 判断订阅是否接收指定事件类型
    ///
    /// 白名单为空或请求未携带事件类型时一律放行。
    pub fn allows_event(&self, event_type: Option<&str>) -> bool {
        let Some(event_type) = event_type.filter(|e| !e.is_empty()) else {
            return true;
        };
        match self.event_types.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(allowed) => allowed.split(',').any(|et| et.trim() == event_type),
            None => true,
        }
    }
}
