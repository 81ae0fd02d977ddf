// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了
/// 业务规则和领域逻辑，协调多个仓库来完成业务操作。
///
/// 包含的服务：
/// - 订阅服务（subscription_service）：订阅管理与读穿透缓存
/// - 入站服务（ingestion_service）：事件过滤、签名校验与入队
/// - 死信服务（dead_letter_service）：死信分页、重新入队与删除
/// - 定时服务（scheduled_service）：定时投递的创建、查询与删除
/// - 投递查询服务（delivery_query_service）：任务详情与最近日志
pub mod dead_letter_service;
pub mod delivery_query_service;
pub mod ingestion_service;
pub mod scheduled_service;
pub mod subscription_service;
