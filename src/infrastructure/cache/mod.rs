// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// 订阅查找缓存的进程内与Redis实现
pub mod redis_client;
pub mod subscription_cache;
