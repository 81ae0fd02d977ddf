// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台周期任务和工作器管理功能
/// 包括投递、定时物化、日志清理以及统一的生命周期管理
pub mod cleanup_worker;
pub mod delivery_worker;
pub mod manager;
pub mod scheduled_worker;
pub mod worker;

pub use worker::Worker;
