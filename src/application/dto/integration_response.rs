// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::brand_integration::{BoardIds, BrandIntegrationSettings, LastSync};
use crate::domain::services::monday_api::MondayUser;

/// 品牌集成状态，不包含令牌
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStatusDto {
    pub connected: bool,
    /// 已连接且至少配置了一个看板
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_ids: Option<BoardIds>,
    pub last_sync: Option<LastSync>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_verified_at: Option<DateTime<Utc>>,
}

impl IntegrationStatusDto {
    /// 没有设置记录的品牌
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            configured: false,
            board_ids: None,
            last_sync: None,
            webhook_verified_at: None,
        }
    }
}

impl From<BrandIntegrationSettings> for IntegrationStatusDto {
    fn from(settings: BrandIntegrationSettings) -> Self {
        let connected = settings.is_connected();
        Self {
            connected,
            configured: connected && settings.board_ids.any_configured(),
            board_ids: Some(settings.board_ids),
            last_sync: settings.last_sync,
            webhook_verified_at: settings.webhook_verified_at,
        }
    }
}

/// 连接测试结果
#[derive(Debug, Serialize)]
pub struct TestConnectionResponseDto {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<MondayUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
