// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 状态列变更事件类型
pub const UPDATE_COLUMN_VALUE: &str = "update_column_value";

/// 状态列ID
pub const STATUS_COLUMN_ID: &str = "status";

/// Monday.com webhook 请求体
///
/// 握手请求只带 `challenge`，事件通知带 `event`。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<MondayEvent>,
}

/// Monday.com 条目ID
///
/// Monday.com 有时以数字、有时以字符串发送条目ID，
/// 本地统一按字符串比较。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// 一次 Monday.com 事件通知
///
/// 未识别的字段保存在 `extra` 中，随审计日志原样记录。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MondayEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    /// 列的新值，形状随列类型变化
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MondayEvent {
    /// 是否为状态列变更
    pub fn is_status_change(&self) -> bool {
        self.event_type == UPDATE_COLUMN_VALUE
            && self.column_id.as_deref() == Some(STATUS_COLUMN_ID)
    }

    /// 字符串形式的条目ID
    pub fn item_id_string(&self) -> Option<String> {
        self.item_id
            .as_ref()
            .map(|id| id.to_string())
            .filter(|id| !id.is_empty())
    }

    /// 新的状态标签文本
    pub fn status_label(&self) -> Option<&str> {
        self.value
            .as_ref()
            .and_then(|v| v.pointer("/label/text"))
            .and_then(|t| t.as_str())
    }
}
