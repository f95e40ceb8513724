// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::services::rate_limiting_service::RateLimitingError;
use crate::utils::retry_policy::Retryable;

/// GraphQL 错误信息中表示限流或复杂度预算耗尽的关键字
const THROTTLE_MARKERS: [&str; 5] = [
    "complexity",
    "rate limit",
    "ratelimit",
    "too many requests",
    "budget exhausted",
];

/// Monday.com API 错误
#[derive(Error, Debug, Clone)]
pub enum MondayApiError {
    /// 网络错误（连接失败、超时）
    #[error("Network error: {0}")]
    Network(String),
    /// 非 2xx 响应
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// 200 响应中的 GraphQL `errors`
    #[error("Monday.com API error: {0}")]
    GraphQl(String),
    /// 响应结构不符合预期
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// 限流器故障
    #[error("Rate limiter error: {0}")]
    RateLimiter(String),
}

impl Retryable for MondayApiError {
    fn is_transient(&self) -> bool {
        match self {
            MondayApiError::Network(_) => true,
            MondayApiError::Http { status, .. } => *status == 429 || *status >= 500,
            MondayApiError::GraphQl(message) => {
                let message = message.to_lowercase();
                THROTTLE_MARKERS.iter().any(|marker| message.contains(marker))
            }
            MondayApiError::Decode(_) | MondayApiError::RateLimiter(_) => false,
        }
    }
}

impl From<RateLimitingError> for MondayApiError {
    fn from(e: RateLimitingError) -> Self {
        MondayApiError::RateLimiter(e.to_string())
    }
}

/// `me` 查询返回的账户信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MondayUser {
    pub name: String,
    pub email: String,
}

/// Monday.com API 特质
///
/// 每个方法都以品牌自己的令牌调用，
/// 实现负责限流和重试。
#[async_trait]
pub trait MondayApi: Send + Sync {
    /// 创建条目，返回条目ID
    async fn create_item(
        &self,
        token: &str,
        board_id: &str,
        item_name: &str,
        column_values: &serde_json::Value,
    ) -> Result<String, MondayApiError>;

    /// 更新已有条目的多个列，返回条目ID
    async fn change_multiple_column_values(
        &self,
        token: &str,
        board_id: &str,
        item_id: &str,
        column_values: &serde_json::Value,
    ) -> Result<String, MondayApiError>;

    /// 查询令牌所属账户
    async fn me(&self, token: &str) -> Result<MondayUser, MondayApiError>;

    /// 创建看板，返回看板ID
    async fn create_board(
        &self,
        token: &str,
        board_name: &str,
        board_kind: &str,
    ) -> Result<String, MondayApiError>;

    /// 在看板上创建列，返回列ID
    async fn create_column(
        &self,
        token: &str,
        board_id: &str,
        title: &str,
        column_type: &str,
    ) -> Result<String, MondayApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(MondayApiError::Network("reset".into()).is_transient());
        assert!(MondayApiError::Http { status: 429, body: String::new() }.is_transient());
        assert!(MondayApiError::Http { status: 503, body: String::new() }.is_transient());
        assert!(!MondayApiError::Http { status: 401, body: String::new() }.is_transient());
        assert!(!MondayApiError::Http { status: 422, body: String::new() }.is_transient());
        assert!(MondayApiError::GraphQl("Complexity budget exhausted".into()).is_transient());
        assert!(!MondayApiError::GraphQl("Column not found".into()).is_transient());
        assert!(!MondayApiError::Decode("missing id".into()).is_transient());
    }
}
