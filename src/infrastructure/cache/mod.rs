// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 缓存模块
///
/// Redis 客户端，用于多实例共享的出站令牌池
pub mod redis_client;
