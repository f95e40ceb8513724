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
/// - 品牌集成仓库（brand_integration_repository）：每个品牌的 Monday.com 设置
/// - 本地记录仓库（local_record_repository）：线索、订单、发票、门店活动
/// - 同步意图仓库（sync_intent_repository）：出站同步发件箱
/// - 同步日志仓库（sync_log_repository）：同步审计日志
pub mod brand_integration_repository;
pub mod local_record_repository;
pub mod sync_intent_repository;
pub mod sync_log_repository;
