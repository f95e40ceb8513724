// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "brand_integrations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub brand_id: String,
    pub api_token: Option<String>,
    pub leads_board_id: Option<String>,
    pub orders_board_id: Option<String>,
    pub invoices_board_id: Option<String>,
    pub activations_board_id: Option<String>,
    pub accounts_board_id: Option<String>,
    pub last_sync_at: Option<DateTimeWithTimeZone>,
    pub last_sync_success: Option<bool>,
    pub last_sync_action: Option<String>,
    pub webhook_verified_at: Option<DateTimeWithTimeZone>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
