// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的 SeaORM 实现
pub mod brand_integration_repo_impl;
pub mod local_record_repo_impl;
pub mod sync_intent_repo_impl;
pub mod sync_log_repo_impl;
