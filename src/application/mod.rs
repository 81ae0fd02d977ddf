// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 请求DTO与其校验规则，把HTTP输入转换为领域服务的参数
pub mod dto;
