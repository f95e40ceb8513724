// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// Monday.com GraphQL 客户端
///
/// 所有请求经过全局限流器，并按重试策略处理瞬时故障
pub mod client;
pub mod graphql;
