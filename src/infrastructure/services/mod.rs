// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施服务模块
///
/// 出站限流令牌池的进程内和 Redis 实现
pub mod reservoir_impl;
