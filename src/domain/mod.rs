// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：订阅、投递任务、日志、死信与定时投递
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：领域服务和业务规则
///
/// 领域层体现了纯粹的业务逻辑和业务规则，
/// 基础设施只通过仓库与缓存特质接入。
pub mod models;
pub mod repositories;
pub mod services;
