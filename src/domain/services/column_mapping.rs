// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::domain::models::local_record::{EntityType, FieldValue, LocalRecord};

/// 列映射表版本
///
/// 修改任何映射时递增，版本号随出站日志一起记录
pub const COLUMN_MAPPING_VERSION: u32 = 2;

/// Monday.com 列类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numbers,
    Text,
    Email,
    Status,
    Date,
    /// 只写地址，坐标置零
    Location,
}

/// 一条本地字段到看板列的映射
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// 本地字段名
    pub field: &'static str,
    /// 看板列ID
    pub column_id: &'static str,
    pub kind: ColumnKind,
}

const fn map(field: &'static str, column_id: &'static str, kind: ColumnKind) -> ColumnMapping {
    ColumnMapping {
        field,
        column_id,
        kind,
    }
}

const LEAD_COLUMNS: &[ColumnMapping] = &[
    map("contact_person", "text", ColumnKind::Text),
    map("email", "email", ColumnKind::Email),
    map("status", "status", ColumnKind::Status),
];

const ORDER_COLUMNS: &[ColumnMapping] = &[
    map("amount", "numbers", ColumnKind::Numbers),
    map("status", "status", ColumnKind::Status),
    map("order_date", "date", ColumnKind::Date),
];

const INVOICE_COLUMNS: &[ColumnMapping] = &[
    map("amount", "numbers", ColumnKind::Numbers),
    map("status", "status", ColumnKind::Status),
    map("due_date", "date4", ColumnKind::Date),
];

const ACTIVATION_COLUMNS: &[ColumnMapping] = &[
    map("activation_date", "date", ColumnKind::Date),
    map("store_name", "text", ColumnKind::Text),
    map("activation_type", "status", ColumnKind::Status),
];

const ACCOUNT_COLUMNS: &[ColumnMapping] = &[
    map("stage", "status", ColumnKind::Status),
    map("license_number", "text", ColumnKind::Text),
    map("address", "location", ColumnKind::Location),
    map("last_sale_date", "date", ColumnKind::Date),
];

/// 列映射错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnMappingError {
    #[error("{entity_type} has no field '{field}' for column '{column_id}'")]
    UnknownField {
        entity_type: EntityType,
        field: &'static str,
        column_id: &'static str,
    },
    #[error("{entity_type} field '{field}' cannot be written to a {kind:?} column")]
    KindMismatch {
        entity_type: EntityType,
        field: &'static str,
        kind: ColumnKind,
    },
    #[error("{entity_type} maps column '{column_id}' more than once")]
    DuplicateColumn {
        entity_type: EntityType,
        column_id: &'static str,
    },
}

/// 实体类型的列映射
pub fn mappings_for(entity_type: EntityType) -> &'static [ColumnMapping] {
    match entity_type {
        EntityType::Lead => LEAD_COLUMNS,
        EntityType::Order => ORDER_COLUMNS,
        EntityType::Invoice => INVOICE_COLUMNS,
        EntityType::Activation => ACTIVATION_COLUMNS,
        EntityType::Account => ACCOUNT_COLUMNS,
    }
}

fn render_value(
    entity_type: EntityType,
    mapping: &ColumnMapping,
    value: FieldValue,
) -> Result<Value, ColumnMappingError> {
    let rendered = match (mapping.kind, value) {
        (ColumnKind::Numbers, FieldValue::Number(n)) => json!(n),
        (ColumnKind::Text, FieldValue::Text(t)) => json!(t),
        (ColumnKind::Email, FieldValue::Text(t)) => json!({ "email": t, "text": t }),
        (ColumnKind::Status, FieldValue::Text(t)) => json!({ "label": t }),
        (ColumnKind::Date, FieldValue::Date(d)) => {
            json!({ "date": d.format("%Y-%m-%d").to_string() })
        }
        (ColumnKind::Location, FieldValue::Text(t)) => json!({ "lat": 0, "lng": 0, "address": t }),
        _ => {
            return Err(ColumnMappingError::KindMismatch {
                entity_type,
                field: mapping.field,
                kind: mapping.kind,
            })
        }
    };
    Ok(rendered)
}

/// 生成 `column_values` 对象
///
/// 键为看板列ID，值为 Monday.com 期望的列值格式
pub fn render_column_values(record: &LocalRecord) -> Result<Value, ColumnMappingError> {
    let entity_type = record.entity_type();
    let mut values = Map::new();

    for mapping in mappings_for(entity_type) {
        let value = record
            .field_value(mapping.field)
            .ok_or(ColumnMappingError::UnknownField {
                entity_type,
                field: mapping.field,
                column_id: mapping.column_id,
            })?;
        values.insert(
            mapping.column_id.to_string(),
            render_value(entity_type, mapping, value)?,
        );
    }

    Ok(Value::Object(values))
}

/// 启动时校验整张映射表
///
/// 每个字段都必须能从对应实体读取，类型必须与列类型兼容，
/// 同一实体内列ID不得重复。
pub fn validate_mapping_table() -> Result<(), ColumnMappingError> {
    for entity_type in EntityType::ALL {
        let mappings = mappings_for(entity_type);
        for (i, mapping) in mappings.iter().enumerate() {
            if mappings[..i].iter().any(|m| m.column_id == mapping.column_id) {
                return Err(ColumnMappingError::DuplicateColumn {
                    entity_type,
                    column_id: mapping.column_id,
                });
            }
        }
        render_column_values(&LocalRecord::blank(entity_type))?;
    }
    Ok(())
}
