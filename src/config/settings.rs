// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、Redis、服务器、缓存以及各后台工作器的全部配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    #[serde(default)]
    pub redis: RedisSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 订阅缓存配置
    pub cache: CacheSettings,
    /// 投递工作器配置
    pub delivery: DeliverySettings,
    /// 定时投递工作器配置
    pub scheduler: SchedulerSettings,
    /// 日志清理工作器配置
    pub cleanup: CleanupSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 是否输出SQL日志
    pub log_queries: Option<bool>,
}

/// Redis配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL，仅在 cache.backend = "redis" 时需要
    pub url: Option<String>,
    /// 单次操作超时（毫秒），超时视为缓存未命中
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_timeout_ms() -> u64 {
    500
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

impl RedisSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 缓存后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// 进程内缓存
    Memory,
    /// Redis缓存
    Redis,
}

/// 订阅缓存配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// 缓存后端
    pub backend: CacheBackend,
    /// 条目存活时间（秒），从写入时开始计算
    pub ttl_seconds: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

/// 投递工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySettings {
    /// 轮询间隔（秒）
    pub poll_interval_seconds: u64,
    /// 最大尝试次数
    pub max_attempts: i32,
    /// 单次HTTP请求超时（秒）
    pub request_timeout_seconds: u64,
    /// 每轮最多拉取的任务数
    pub batch_size: u64,
    /// 每轮并发投递数
    pub concurrency: usize,
}

impl DeliverySettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 5,
            max_attempts: 5,
            request_timeout_seconds: 10,
            batch_size: 100,
            concurrency: 10,
        }
    }
}

/// 定时投递工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    /// 轮询间隔（秒）
    pub poll_interval_seconds: u64,
}

impl SchedulerSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// 日志清理工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupSettings {
    /// 运行间隔（秒）
    pub interval_seconds: u64,
    /// 投递日志保留天数
    pub retention_days: i64,
}

impl CleanupSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.retention_days)
    }
}

/// 指标导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、config/default、config/{APP_ENVIRONMENT}
    /// 以及 HOOKRELAY__ 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("HOOKRELAY").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 仅包含内置默认值的配置构建器
    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Start with default settings
            .set_default("database.url", "sqlite://hookrelay.db?mode=rwc")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Subscription cache
            .set_default("cache.backend", "memory")?
            .set_default("cache.ttl_seconds", 300)?
            // Delivery worker
            .set_default("delivery.poll_interval_seconds", 5)?
            .set_default("delivery.max_attempts", 5)?
            .set_default("delivery.request_timeout_seconds", 10)?
            .set_default("delivery.batch_size", 100)?
            .set_default("delivery.concurrency", 10)?
            // Scheduled worker
            .set_default("scheduler.poll_interval_seconds", 10)?
            // Cleanup worker
            .set_default("cleanup.interval_seconds", 3600)?
            .set_default("cleanup.retention_days", 30)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
