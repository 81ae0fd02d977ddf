// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 基于SeaORM的领域仓库接口实现
pub mod dead_letter_repo_impl;
pub mod delivery_log_repo_impl;
pub mod delivery_task_repo_impl;
pub mod scheduled_webhook_repo_impl;
pub mod subscription_repo_impl;
