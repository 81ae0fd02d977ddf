// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 订阅仓库（subscription_repository）
/// - 投递任务仓库（delivery_task_repository）：同时定义公共的 RepositoryError
/// - 投递日志仓库（delivery_log_repository）
/// - 死信仓库（dead_letter_repository）
/// - 定时投递仓库（scheduled_webhook_repository）
pub mod dead_letter_repository;
pub mod delivery_log_repository;
pub mod delivery_task_repository;
pub mod scheduled_webhook_repository;
pub mod subscription_repository;
