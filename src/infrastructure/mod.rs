// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含系统的技术实现细节，依赖领域层的抽象接口。
///
/// 包含的子模块：
/// - 缓存（cache）：Redis 客户端，供共享令牌池使用
/// - 数据库（database）：数据库连接和实体映射
/// - 指标（metrics）：Prometheus 导出
/// - Monday.com 客户端（monday）：GraphQL 请求、限流和重试
/// - 仓库实现（repositories）：领域仓库接口的具体实现
/// - 服务实现（services）：令牌池后端
pub mod cache;
pub mod database;
pub mod metrics;
pub mod monday;
pub mod repositories;
pub mod services;
