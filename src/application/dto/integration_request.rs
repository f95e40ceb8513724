// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::brand_integration::BoardIds;

/// 保存品牌 Monday.com 设置
///
/// 未提供的字段保持原值
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIntegrationRequestDto {
    #[validate(length(min = 1, max = 2048))]
    pub api_token: Option<String>,
    pub board_ids: Option<BoardIds>,
}

/// 测试令牌连通性
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionRequestDto {
    #[validate(length(min = 1, max = 2048))]
    pub api_token: String,
}
