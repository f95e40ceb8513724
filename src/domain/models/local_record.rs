// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::sync_log::SyncAction;

/// 可同步的本地实体类型
///
/// 每种类型对应 Monday.com 上的一个看板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// 线索（药房潜在客户）
    Lead,
    /// 订单（sales 表）
    Order,
    /// 发票
    Invoice,
    /// 门店活动
    Activation,
    /// 线索在 Accounts 看板上的客户视图，数据仍存于 `leads`
    Account,
}

impl EntityType {
    /// 全部实体类型
    pub const ALL: [EntityType; 5] = [
        EntityType::Lead,
        EntityType::Order,
        EntityType::Invoice,
        EntityType::Activation,
        EntityType::Account,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Lead => "lead",
            EntityType::Order => "order",
            EntityType::Invoice => "invoice",
            EntityType::Activation => "activation",
            EntityType::Account => "account",
        }
    }

    /// 该实体类型对应的同步动作
    pub fn sync_action(&self) -> SyncAction {
        match self {
            EntityType::Lead => SyncAction::SyncLead,
            EntityType::Order => SyncAction::SyncOrder,
            EntityType::Invoice => SyncAction::SyncInvoice,
            EntityType::Activation => SyncAction::SyncActivation,
            EntityType::Account => SyncAction::SyncAccount,
        }
    }

    /// 审计日志 details 中记录实体ID所用的键名
    pub fn details_key(&self) -> &'static str {
        match self {
            EntityType::Lead | EntityType::Account => "leadId",
            EntityType::Order => "orderId",
            EntityType::Invoice => "invoiceId",
            EntityType::Activation => "activationId",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(EntityType::Lead),
            "order" => Ok(EntityType::Order),
            "invoice" => Ok(EntityType::Invoice),
            "activation" => Ok(EntityType::Activation),
            "account" => Ok(EntityType::Account),
            other => Err(format!("unknown entity type: {}", other)),
        }
    }
}

/// 指向某条本地记录的引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRef {
    pub entity_type: EntityType,
    pub id: Uuid,
}

impl RecordRef {
    pub fn new(entity_type: EntityType, id: Uuid) -> Self {
        Self { entity_type, id }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.entity_type, self.id)
    }
}

/// 药房线索
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    /// 拥有该线索的品牌
    pub owner_brand_id: String,
    pub dispensary_name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub last_sale_date: Option<NaiveDate>,
    /// Monday.com 条目ID，同一品牌内唯一
    pub monday_item_id: Option<String>,
    pub monday_synced_at: Option<DateTime<Utc>>,
    /// Accounts 看板上的条目ID，与线索看板的条目相互独立
    pub monday_account_item_id: Option<String>,
    pub monday_account_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 订单（sales 表中的一笔销售）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub brand_id: String,
    pub dispensary_name: Option<String>,
    /// 订单金额（美分）
    pub amount_cents: i64,
    pub status: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub monday_item_id: Option<String>,
    pub monday_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 发票
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub brand_id: String,
    pub dispensary_name: Option<String>,
    /// 发票金额（美分）
    pub amount_cents: i64,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub monday_item_id: Option<String>,
    pub monday_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 门店活动（试吃、快闪等）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub id: Uuid,
    pub brand_id: String,
    pub store_name: Option<String>,
    pub activation_type: Option<String>,
    pub activation_date: Option<NaiveDate>,
    pub monday_item_id: Option<String>,
    pub monday_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 映射到看板列的字段值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

/// 可同步到 Monday.com 的本地记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entityType", rename_all = "lowercase")]
pub enum LocalRecord {
    Lead(Lead),
    Order(Order),
    Invoice(Invoice),
    Activation(Activation),
    Account(Lead),
}

impl LocalRecord {
    pub fn entity_type(&self) -> EntityType {
        match self {
            LocalRecord::Lead(_) => EntityType::Lead,
            LocalRecord::Order(_) => EntityType::Order,
            LocalRecord::Invoice(_) => EntityType::Invoice,
            LocalRecord::Activation(_) => EntityType::Activation,
            LocalRecord::Account(_) => EntityType::Account,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            LocalRecord::Lead(r) | LocalRecord::Account(r) => r.id,
            LocalRecord::Order(r) => r.id,
            LocalRecord::Invoice(r) => r.id,
            LocalRecord::Activation(r) => r.id,
        }
    }

    pub fn record_ref(&self) -> RecordRef {
        RecordRef::new(self.entity_type(), self.id())
    }

    /// 记录所属品牌（线索使用 owner_brand_id）
    pub fn brand_id(&self) -> &str {
        match self {
            LocalRecord::Lead(r) | LocalRecord::Account(r) => &r.owner_brand_id,
            LocalRecord::Order(r) => &r.brand_id,
            LocalRecord::Invoice(r) => &r.brand_id,
            LocalRecord::Activation(r) => &r.brand_id,
        }
    }

    pub fn monday_item_id(&self) -> Option<&str> {
        match self {
            LocalRecord::Lead(r) => r.monday_item_id.as_deref(),
            LocalRecord::Order(r) => r.monday_item_id.as_deref(),
            LocalRecord::Invoice(r) => r.monday_item_id.as_deref(),
            LocalRecord::Activation(r) => r.monday_item_id.as_deref(),
            LocalRecord::Account(r) => r.monday_account_item_id.as_deref(),
        }
        .filter(|id| !id.is_empty())
    }

    /// 看板条目名称
    pub fn item_name(&self) -> String {
        match self {
            LocalRecord::Lead(r) => r.dispensary_name.clone(),
            LocalRecord::Order(r) => format!(
                "Order: {}",
                non_empty(&r.dispensary_name).unwrap_or("Unknown")
            ),
            LocalRecord::Invoice(r) => format!(
                "Invoice: {}",
                non_empty(&r.dispensary_name).unwrap_or("Unknown")
            ),
            LocalRecord::Activation(r) => format!(
                "Activation @ {}",
                non_empty(&r.store_name).unwrap_or("Unknown Store")
            ),
            LocalRecord::Account(r) => {
                let name = r.dispensary_name.trim();
                if name.is_empty() {
                    "Unknown Dispensary".to_string()
                } else {
                    name.to_string()
                }
            }
        }
    }

    /// 读取一个可映射字段的值，缺失时使用默认值
    ///
    /// 未知字段返回 `None`，列映射表在启动时据此校验
    pub fn field_value(&self, field: &str) -> Option<FieldValue> {
        let today = || Utc::now().date_naive();
        let text = |value: &Option<String>, default: &str| {
            FieldValue::Text(non_empty(value).unwrap_or(default).to_string())
        };

        match (self, field) {
            (LocalRecord::Lead(r), "contact_person") => Some(text(&r.contact_person, "")),
            (LocalRecord::Lead(r), "email") => Some(text(&r.email, "")),
            (LocalRecord::Lead(r), "status") => Some(text(&r.status, "New")),

            (LocalRecord::Order(r), "amount") => Some(FieldValue::Number(cents_to_dollars(r.amount_cents))),
            (LocalRecord::Order(r), "status") => Some(text(&r.status, "Pending")),
            (LocalRecord::Order(r), "order_date") => {
                Some(FieldValue::Date(r.order_date.unwrap_or_else(today)))
            }

            (LocalRecord::Invoice(r), "amount") => {
                Some(FieldValue::Number(cents_to_dollars(r.amount_cents)))
            }
            (LocalRecord::Invoice(r), "status") => Some(text(&r.status, "Unpaid")),
            (LocalRecord::Invoice(r), "due_date") => {
                Some(FieldValue::Date(r.due_date.unwrap_or_else(today)))
            }

            (LocalRecord::Activation(r), "activation_date") => {
                Some(FieldValue::Date(r.activation_date.unwrap_or_else(today)))
            }
            (LocalRecord::Activation(r), "store_name") => {
                Some(text(&r.store_name, "Unknown Location"))
            }
            (LocalRecord::Activation(r), "activation_type") => {
                let label = match r.activation_type.as_deref() {
                    Some("Sampling") => "Sampling",
                    _ => "Pop-up",
                };
                Some(FieldValue::Text(label.to_string()))
            }

            (LocalRecord::Account(r), "stage") => {
                let label = match r.status.as_deref() {
                    Some(s) if s.eq_ignore_ascii_case("active") => "Active",
                    _ => "Prospect",
                };
                Some(FieldValue::Text(label.to_string()))
            }
            (LocalRecord::Account(r), "license_number") => Some(text(&r.license_number, "")),
            (LocalRecord::Account(r), "address") => Some(text(&r.address, "Unknown")),
            (LocalRecord::Account(r), "last_sale_date") => {
                Some(FieldValue::Date(r.last_sale_date.unwrap_or_else(today)))
            }
            _ => None,
        }
    }

    /// 某类型的空白记录，用于列映射校验
    pub fn blank(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Lead => LocalRecord::Lead(Lead::default()),
            EntityType::Order => LocalRecord::Order(Order::default()),
            EntityType::Invoice => LocalRecord::Invoice(Invoice::default()),
            EntityType::Activation => LocalRecord::Activation(Activation::default()),
            EntityType::Account => LocalRecord::Account(Lead::default()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}
