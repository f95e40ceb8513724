// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 品牌集成设置（brand_integration）：每个品牌的 Monday.com 凭证与看板配置
/// - 本地记录（local_record）：线索、订单、发票、门店活动
/// - Monday 事件（monday_event）：入站 webhook 的请求体
/// - 代理班次（shift）：计费输入与费用明细
/// - 同步意图（sync_intent）：待投递的出站同步
/// - 同步日志（sync_log）：只追加的审计记录
pub mod brand_integration;
pub mod local_record;
pub mod monday_event;
pub mod shift;
pub mod sync_intent;
pub mod sync_log;
