// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 后台任务：发件箱投递和审计日志清理
pub mod sync_log_trim_worker;
pub mod sync_outbox_worker;
