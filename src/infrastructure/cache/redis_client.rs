// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Result};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;

/// Redis客户端
///
/// 订阅缓存使用的最小键值操作集合。每个操作（含建立连接）都受 `timeout` 约束，
/// 超时按普通错误返回
#[derive(Clone)]
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
    /// 单次操作的时间上限
    timeout: Duration,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// 只解析连接URL，不会立即建立连接
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    /// * `timeout` - 单次操作的时间上限
    pub fn new(redis_url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client, timeout })
    }

    async fn bounded<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = redis::RedisResult<T>>,
    {
        let work = async {
            let con = self.client.get_multiplexed_async_connection().await?;
            op(con).await
        };
        match tokio::time::timeout(self.timeout, work).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(anyhow!("redis operation timed out after {:?}", self.timeout)),
        }
    }

    /// 获取指定键的值
    ///
    /// # 返回值
    ///
    /// * `Ok(Option<String>)` - 键对应的值，如果不存在则返回None
    /// * `Err(anyhow::Error)` - 获取失败或超时
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.bounded(|mut con| async move { con.get::<_, Option<String>>(key).await })
            .await
    }

    /// 设置键值对并指定过期时间
    ///
    /// # 参数
    ///
    /// * `key` - 键
    /// * `value` - 值
    /// * `ttl_seconds` - 过期时间（秒）
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        self.bounded(|mut con| async move { con.set_ex::<_, _, ()>(key, value, ttl_seconds).await })
            .await
    }

    /// 删除指定键，键不存在时同样返回成功
    pub async fn del(&self, key: &str) -> Result<()> {
        self.bounded(|mut con| async move { con.del::<_, ()>(key).await })
            .await
    }
}
