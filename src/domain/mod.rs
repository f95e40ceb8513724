// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：本地记录、集成设置、审计日志、发件箱和计费数据结构
/// - 仓库接口（repositories）：数据持久化抽象接口
/// - 服务（services）：同步、对账、限流和计费规则
///
/// 领域层不依赖于任何具体的存储或 HTTP 实现。
pub mod models;
pub mod repositories;
pub mod services;
