// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 同步方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    /// 本地记录推送到 Monday.com
    Outbound,
    /// Monday.com 推送的 webhook 事件
    Inbound,
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncDirection::Outbound => write!(f, "outbound"),
            SyncDirection::Inbound => write!(f, "inbound"),
        }
    }
}

impl FromStr for SyncDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outbound" => Ok(SyncDirection::Outbound),
            "inbound" => Ok(SyncDirection::Inbound),
            other => Err(format!("unknown sync direction: {}", other)),
        }
    }
}

/// 同步动作
///
/// 审计日志和 `last_sync` 中记录的动作名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncAction {
    #[serde(rename = "syncLead")]
    SyncLead,
    #[serde(rename = "syncOrder")]
    SyncOrder,
    #[serde(rename = "syncInvoice")]
    SyncInvoice,
    #[serde(rename = "syncActivation")]
    SyncActivation,
    #[serde(rename = "syncAccount")]
    SyncAccount,
    #[serde(rename = "webhookEvent")]
    WebhookEvent,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::SyncLead => "syncLead",
            SyncAction::SyncOrder => "syncOrder",
            SyncAction::SyncInvoice => "syncInvoice",
            SyncAction::SyncActivation => "syncActivation",
            SyncAction::SyncAccount => "syncAccount",
            SyncAction::WebhookEvent => "webhookEvent",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "syncLead" => Ok(SyncAction::SyncLead),
            "syncOrder" => Ok(SyncAction::SyncOrder),
            "syncInvoice" => Ok(SyncAction::SyncInvoice),
            "syncActivation" => Ok(SyncAction::SyncActivation),
            "syncAccount" => Ok(SyncAction::SyncAccount),
            "webhookEvent" => Ok(SyncAction::WebhookEvent),
            other => Err(format!("unknown sync action: {}", other)),
        }
    }
}

/// 同步审计日志条目
///
/// 一次同步尝试或一次入站事件的不可变记录。
/// `id` 在写入时由数据库分配，单调递增。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncLogEntry {
    /// 日志ID，新建条目时为 0
    pub id: i64,
    pub brand_id: String,
    pub direction: SyncDirection,
    pub action: SyncAction,
    pub success: bool,
    /// 实体ID、Monday 条目ID、事件内容等
    pub details: serde_json::Value,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SyncLogEntry {
    /// 创建一个出站同步日志条目
    pub fn outbound(
        brand_id: impl Into<String>,
        action: SyncAction,
        success: bool,
        details: serde_json::Value,
        error: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            brand_id: brand_id.into(),
            direction: SyncDirection::Outbound,
            action,
            success,
            details,
            error,
            timestamp: Utc::now(),
        }
    }

    /// 创建一个入站 webhook 日志条目
    pub fn inbound(
        brand_id: impl Into<String>,
        success: bool,
        details: serde_json::Value,
        error: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            brand_id: brand_id.into(),
            direction: SyncDirection::Inbound,
            action: SyncAction::WebhookEvent,
            success,
            details,
            error,
            timestamp: Utc::now(),
        }
    }
}
