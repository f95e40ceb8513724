// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_brand_id: String,
    pub dispensary_name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub license_number: Option<String>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub last_sale_date: Option<Date>,
    pub monday_item_id: Option<String>,
    pub monday_synced_at: Option<DateTimeWithTimeZone>,
    /// Accounts 看板上的条目ID
    pub monday_account_item_id: Option<String>,
    pub monday_account_synced_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
