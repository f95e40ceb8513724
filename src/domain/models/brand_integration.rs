// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::local_record::EntityType;
use super::sync_log::SyncAction;

/// 各实体类型对应的 Monday.com 看板ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardIds {
    pub leads: Option<String>,
    pub orders: Option<String>,
    pub invoices: Option<String>,
    pub activations: Option<String>,
    pub accounts: Option<String>,
}

impl BoardIds {
    /// 获取实体类型对应的看板ID，空字符串视为未配置
    pub fn for_entity(&self, entity_type: EntityType) -> Option<&str> {
        match entity_type {
            EntityType::Lead => self.leads.as_deref(),
            EntityType::Order => self.orders.as_deref(),
            EntityType::Invoice => self.invoices.as_deref(),
            EntityType::Activation => self.activations.as_deref(),
            EntityType::Account => self.accounts.as_deref(),
        }
        .filter(|id| !id.trim().is_empty())
    }

    pub fn set(&mut self, entity_type: EntityType, board_id: String) {
        let slot = match entity_type {
            EntityType::Lead => &mut self.leads,
            EntityType::Order => &mut self.orders,
            EntityType::Invoice => &mut self.invoices,
            EntityType::Activation => &mut self.activations,
            EntityType::Account => &mut self.accounts,
        };
        *slot = Some(board_id);
    }

    /// 是否至少配置了一个看板
    pub fn any_configured(&self) -> bool {
        EntityType::ALL
            .iter()
            .any(|entity_type| self.for_entity(*entity_type).is_some())
    }
}

/// 最近一次出站同步的摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastSync {
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub action: SyncAction,
}

/// 品牌的 Monday.com 集成设置
///
/// 每个品牌一行。断开连接时只清空令牌，不删除记录。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandIntegrationSettings {
    pub brand_id: String,
    /// API 令牌，永不序列化到响应中
    #[serde(skip_serializing, default)]
    pub api_token: Option<String>,
    pub board_ids: BoardIds,
    pub last_sync: Option<LastSync>,
    pub webhook_verified_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl BrandIntegrationSettings {
    pub fn new(brand_id: impl Into<String>) -> Self {
        Self {
            brand_id: brand_id.into(),
            api_token: None,
            board_ids: BoardIds::default(),
            last_sync: None,
            webhook_verified_at: None,
            updated_at: Utc::now(),
        }
    }

    /// 有非空令牌即视为已连接
    pub fn is_connected(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.api_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}
