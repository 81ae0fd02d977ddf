// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了投递引擎的核心业务实体，包括：
/// - 订阅（subscription）：投递目标及其签名、过滤配置
/// - 投递任务（delivery_task）：待投递负载及其状态机
/// - 投递日志（delivery_log）：每次投递尝试的不可变记录
/// - 死信（dead_letter）：重试耗尽任务的快照
/// - 定时投递（scheduled_webhook）：一次性或周期性的计划投递
pub mod dead_letter;
pub mod delivery_log;
pub mod delivery_task;
pub mod scheduled_webhook;
pub mod subscription;
