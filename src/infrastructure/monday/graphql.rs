// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::services::monday_api::MondayApiError;

pub const CREATE_ITEM: &str = r#"
mutation ($boardId: ID!, $itemName: String!, $columnValues: JSON!) {
    create_item (board_id: $boardId, item_name: $itemName, column_values: $columnValues) {
        id
    }
}"#;

pub const CHANGE_MULTIPLE_COLUMN_VALUES: &str = r#"
mutation ($boardId: ID!, $itemId: ID!, $columnValues: JSON!) {
    change_multiple_column_values (board_id: $boardId, item_id: $itemId, column_values: $columnValues) {
        id
    }
}"#;

pub const ME: &str = "query { me { name email } }";

pub const CREATE_BOARD: &str = r#"
mutation ($boardName: String!, $boardKind: BoardKind!) {
    create_board (board_name: $boardName, board_kind: $boardKind) {
        id
    }
}"#;

pub const CREATE_COLUMN: &str = r#"
mutation ($boardId: ID!, $title: String!, $columnType: ColumnType!) {
    create_column (board_id: $boardId, title: $title, column_type: $columnType) {
        id
    }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
    // 旧版接口在顶层返回错误
    #[serde(default)]
    error_message: Option<String>,
}

/// 解析 GraphQL 响应体，返回 `data`
///
/// `errors` 非空时以第一条错误信息作为错误
pub fn parse_response(body: &str) -> Result<Value, MondayApiError> {
    let response: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| MondayApiError::Decode(e.to_string()))?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let message = errors
            .into_iter()
            .find_map(|e| e.message)
            .unwrap_or_else(|| "Monday.com API Error".to_string());
        return Err(MondayApiError::GraphQl(message));
    }
    if let Some(message) = response.error_message {
        return Err(MondayApiError::GraphQl(message));
    }

    response
        .data
        .ok_or_else(|| MondayApiError::Decode("response has no data".to_string()))
}

/// 读取 `data.<field>.id`，ID 可能是字符串或数字
pub fn extract_id(data: &Value, field: &str) -> Result<String, MondayApiError> {
    match data.get(field).and_then(|v| v.get("id")) {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(MondayApiError::Decode(format!("missing {}.id", field))),
    }
}
