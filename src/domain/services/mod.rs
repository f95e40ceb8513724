// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 看板创建（board_provisioning）：为品牌创建默认看板和列
/// - 列映射（column_mapping）：本地字段到看板列的版本化映射
/// - Monday.com API 特质（monday_api）
/// - 计费（pricing_service）：代理班次费用计算
/// - 限流（rate_limiting_service）：出站调用令牌池
/// - 签名校验（signature_service）：webhook HMAC-SHA256 校验
/// - 审计日志（sync_log_service）
/// - 发件箱（sync_outbox_service）：持久化的同步意图
/// - 出站同步（sync_service）
/// - webhook 对账（webhook_reconciler）：入站状态变更回写
pub mod board_provisioning;
pub mod column_mapping;
pub mod monday_api;
pub mod pricing_service;
pub mod rate_limiting_service;
pub mod signature_service;
pub mod sync_log_service;
pub mod sync_outbox_service;
pub mod sync_service;
pub mod webhook_reconciler;
