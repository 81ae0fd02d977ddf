// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::warn;

use crate::domain::models::subscription::Subscription;
use crate::infrastructure::cache::redis_client::RedisClient;

/// 订阅缓存特质
///
/// 订阅ID到订阅记录的映射，条目自写入起经过TTL后失效。
/// 任何实现都不能向调用方返回错误：后端故障一律按未命中处理。
#[async_trait]
pub trait SubscriptionCache: Send + Sync {
    /// 读取缓存，过期或不存在时返回 `None`
    async fn get(&self, id: &str) -> Option<Subscription>;
    /// 写入缓存并重新开始计时
    async fn set(&self, id: &str, subscription: &Subscription);
    /// 删除缓存条目，不存在时为空操作
    async fn delete(&self, id: &str);
}

struct CacheEntry {
    subscription: Subscription,
    inserted_at: Instant,
}

/// 进程内订阅缓存
///
/// 读多写少，使用读写锁保护；除TTL外没有其他淘汰策略
pub struct MemorySubscriptionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl MemorySubscriptionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl SubscriptionCache for MemorySubscriptionCache {
    async fn get(&self, id: &str) -> Option<Subscription> {
        let entries = self.entries.read();
        match entries.get(id) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                counter!("subscription_cache_hits_total").increment(1);
                Some(entry.subscription.clone())
            }
            _ => {
                counter!("subscription_cache_misses_total").increment(1);
                None
            }
        }
    }

    async fn set(&self, id: &str, subscription: &Subscription) {
        let mut entries = self.entries.write();
        // 顺便清理过期条目，避免已删除订阅的旧值长期驻留
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.inserted_at.elapsed() < ttl);
        entries.insert(
            id.to_string(),
            CacheEntry {
                subscription: subscription.clone(),
                inserted_at: Instant::now(),
            },
        );
    }

    async fn delete(&self, id: &str) {
        self.entries.write().remove(id);
    }
}

/// Redis订阅缓存
///
/// 订阅序列化为JSON，依靠 `SET EX` 实现TTL
pub struct RedisSubscriptionCache {
    client: Arc<RedisClient>,
    ttl: Duration,
}

impl RedisSubscriptionCache {
    pub fn new(client: Arc<RedisClient>, ttl: Duration) -> Self {
        Self { client, ttl }
    }

    fn key(id: &str) -> String {
        format!("hookrelay:subscription:{}", id)
    }
}

#[async_trait]
impl SubscriptionCache for RedisSubscriptionCache {
    async fn get(&self, id: &str) -> Option<Subscription> {
        let cached = match self.client.get(&Self::key(id)).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Subscription cache read failed for {}: {}", id, e);
                None
            }
        };

        let subscription = cached.and_then(|json| match serde_json::from_str(&json) {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                warn!("Discarding undecodable cache entry for {}: {}", id, e);
                None
            }
        });

        if subscription.is_some() {
            counter!("subscription_cache_hits_total").increment(1);
        } else {
            counter!("subscription_cache_misses_total").increment(1);
        }
        subscription
    }

    async fn set(&self, id: &str, subscription: &Subscription) {
        let json = match serde_json::to_string(subscription) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to encode subscription {} for cache: {}", id, e);
                return;
            }
        };
        if let Err(e) = self
            .client
            .set(&Self::key(id), &json, self.ttl.as_secs().max(1))
            .await
        {
            warn!("Subscription cache write failed for {}: {}", id, e);
        }
    }

    async fn delete(&self, id: &str) {
        if let Err(e) = self.client.del(&Self::key(id)).await {
            warn!("Subscription cache invalidation failed for {}: {}", id, e);
        }
    }
}
