// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::local_record::{
    Activation, EntityType, Invoice, Lead, LocalRecord, Order, RecordRef,
};
use crate::domain::repositories::local_record_repository::{
    LocalRecordRepository, RepositoryError,
};
use crate::infrastructure::database::entities::{activation, invoice, lead, sale};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::sync::Arc;

/// 本地记录仓库实现
///
/// 线索存于 `leads`，订单存于 `sales`，发票和门店活动各有一张表。
/// 客户视图（Account）复用 `leads` 行，条目ID单独存放。
#[derive(Clone)]
pub struct LocalRecordRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl LocalRecordRepoImpl {
    /// 创建新的本地记录仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn ensure_updated(result: UpdateResult) -> Result<(), RepositoryError> {
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl LocalRecordRepository for LocalRecordRepoImpl {
    async fn insert(&self, record: &LocalRecord) -> Result<LocalRecord, RepositoryError> {
        let db = self.db.as_ref();
        match record.clone() {
            LocalRecord::Lead(r) | LocalRecord::Account(r) => {
                lead::Entity::insert(lead::ActiveModel::from(r)).exec(db).await?;
            }
            LocalRecord::Order(r) => {
                sale::Entity::insert(sale::ActiveModel::from(r)).exec(db).await?;
            }
            LocalRecord::Invoice(r) => {
                invoice::Entity::insert(invoice::ActiveModel::from(r))
                    .exec(db)
                    .await?;
            }
            LocalRecord::Activation(r) => {
                activation::Entity::insert(activation::ActiveModel::from(r))
                    .exec(db)
                    .await?;
            }
        }
        Ok(record.clone())
    }

    async fn find(&self, record_ref: RecordRef) -> Result<Option<LocalRecord>, RepositoryError> {
        let db = self.db.as_ref();
        let record = match record_ref.entity_type {
            EntityType::Lead => lead::Entity::find_by_id(record_ref.id)
                .one(db)
                .await?
                .map(|m| LocalRecord::Lead(m.into())),
            EntityType::Order => sale::Entity::find_by_id(record_ref.id)
                .one(db)
                .await?
                .map(|m| LocalRecord::Order(m.into())),
            EntityType::Invoice => invoice::Entity::find_by_id(record_ref.id)
                .one(db)
                .await?
                .map(|m| LocalRecord::Invoice(m.into())),
            EntityType::Activation => activation::Entity::find_by_id(record_ref.id)
                .one(db)
                .await?
                .map(|m| LocalRecord::Activation(m.into())),
            EntityType::Account => lead::Entity::find_by_id(record_ref.id)
                .one(db)
                .await?
                .map(|m| LocalRecord::Account(m.into())),
        };
        Ok(record)
    }

    async fn find_leads_by_item(
        &self,
        brand_id: &str,
        monday_item_id: &str,
    ) -> Result<Vec<RecordRef>, RepositoryError> {
        let models = lead::Entity::find()
            .filter(lead::Column::OwnerBrandId.eq(brand_id))
            .filter(lead::Column::MondayItemId.eq(monday_item_id))
            .order_by_asc(lead::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| RecordRef::new(EntityType::Lead, m.id))
            .collect())
    }

    async fn find_orders_by_item(
        &self,
        brand_id: &str,
        monday_item_id: &str,
    ) -> Result<Vec<RecordRef>, RepositoryError> {
        let models = sale::Entity::find()
            .filter(sale::Column::BrandId.eq(brand_id))
            .filter(sale::Column::MondayItemId.eq(monday_item_id))
            .order_by_asc(sale::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(models
            .into_iter()
            .map(|m| RecordRef::new(EntityType::Order, m.id))
            .collect())
    }

    async fn update_status(
        &self,
        record_ref: RecordRef,
        status: &str,
        synced_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let db = self.db.as_ref();
        let synced_at: DateTimeWithTimeZone = synced_at.into();
        let result = match record_ref.entity_type {
            EntityType::Lead => {
                lead::Entity::update_many()
                    .col_expr(lead::Column::Status, Expr::value(status))
                    .col_expr(lead::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(lead::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Order => {
                sale::Entity::update_many()
                    .col_expr(sale::Column::Status, Expr::value(status))
                    .col_expr(sale::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(sale::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Invoice => {
                invoice::Entity::update_many()
                    .col_expr(invoice::Column::Status, Expr::value(status))
                    .col_expr(invoice::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(invoice::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Activation => {
                // 门店活动没有状态列，只记录同步时间
                activation::Entity::update_many()
                    .col_expr(activation::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(activation::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Account => {
                lead::Entity::update_many()
                    .col_expr(lead::Column::Status, Expr::value(status))
                    .col_expr(lead::Column::MondayAccountSyncedAt, Expr::value(synced_at))
                    .filter(lead::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
        };
        Self::ensure_updated(result)
    }

    async fn mark_synced(
        &self,
        record_ref: RecordRef,
        monday_item_id: &str,
        synced_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let db = self.db.as_ref();
        let synced_at: DateTimeWithTimeZone = synced_at.into();
        let result = match record_ref.entity_type {
            EntityType::Lead => {
                lead::Entity::update_many()
                    .col_expr(lead::Column::MondayItemId, Expr::value(monday_item_id))
                    .col_expr(lead::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(lead::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Order => {
                sale::Entity::update_many()
                    .col_expr(sale::Column::MondayItemId, Expr::value(monday_item_id))
                    .col_expr(sale::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(sale::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Invoice => {
                invoice::Entity::update_many()
                    .col_expr(invoice::Column::MondayItemId, Expr::value(monday_item_id))
                    .col_expr(invoice::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(invoice::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Activation => {
                activation::Entity::update_many()
                    .col_expr(activation::Column::MondayItemId, Expr::value(monday_item_id))
                    .col_expr(activation::Column::MondaySyncedAt, Expr::value(synced_at))
                    .filter(activation::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
            EntityType::Account => {
                lead::Entity::update_many()
                    .col_expr(
                        lead::Column::MondayAccountItemId,
                        Expr::value(monday_item_id),
                    )
                    .col_expr(lead::Column::MondayAccountSyncedAt, Expr::value(synced_at))
                    .filter(lead::Column::Id.eq(record_ref.id))
                    .exec(db)
                    .await?
            }
        };
        Self::ensure_updated(result)
    }

    async fn find_unsynced(
        &self,
        brand_id: &str,
        entity_type: EntityType,
    ) -> Result<Vec<RecordRef>, RepositoryError> {
        let db = self.db.as_ref();
        let ids = match entity_type {
            EntityType::Lead => lead::Entity::find()
                .filter(lead::Column::OwnerBrandId.eq(brand_id))
                .filter(lead::Column::MondayItemId.is_null())
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect::<Vec<_>>(),
            EntityType::Order => sale::Entity::find()
                .filter(sale::Column::BrandId.eq(brand_id))
                .filter(sale::Column::MondayItemId.is_null())
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect(),
            EntityType::Invoice => invoice::Entity::find()
                .filter(invoice::Column::BrandId.eq(brand_id))
                .filter(invoice::Column::MondayItemId.is_null())
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect(),
            EntityType::Activation => activation::Entity::find()
                .filter(activation::Column::BrandId.eq(brand_id))
                .filter(activation::Column::MondayItemId.is_null())
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect(),
            EntityType::Account => lead::Entity::find()
                .filter(lead::Column::OwnerBrandId.eq(brand_id))
                .filter(lead::Column::MondayAccountItemId.is_null())
                .all(db)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect(),
        };

        Ok(ids
            .into_iter()
            .map(|id| RecordRef::new(entity_type, id))
            .collect())
    }
}

impl From<lead::Model> for Lead {
    fn from(model: lead::Model) -> Self {
        Self {
            id: model.id,
            owner_brand_id: model.owner_brand_id,
            dispensary_name: model.dispensary_name,
            contact_person: model.contact_person,
            email: model.email,
            license_number: model.license_number,
            status: model.status,
            address: model.address,
            last_sale_date: model.last_sale_date,
            monday_item_id: model.monday_item_id,
            monday_synced_at: model.monday_synced_at.map(Into::into),
            monday_account_item_id: model.monday_account_item_id,
            monday_account_synced_at: model.monday_account_synced_at.map(Into::into),
            created_at: model.created_at.into(),
        }
    }
}

impl From<Lead> for lead::ActiveModel {
    fn from(r: Lead) -> Self {
        Self {
            id: Set(r.id),
            owner_brand_id: Set(r.owner_brand_id),
            dispensary_name: Set(r.dispensary_name),
            contact_person: Set(r.contact_person),
            email: Set(r.email),
            license_number: Set(r.license_number),
            status: Set(r.status),
            address: Set(r.address),
            last_sale_date: Set(r.last_sale_date),
            monday_item_id: Set(r.monday_item_id),
            monday_synced_at: Set(r.monday_synced_at.map(Into::into)),
            monday_account_item_id: Set(r.monday_account_item_id),
            monday_account_synced_at: Set(r.monday_account_synced_at.map(Into::into)),
            created_at: Set(r.created_at.into()),
        }
    }
}

impl From<sale::Model> for Order {
    fn from(model: sale::Model) -> Self {
        Self {
            id: model.id,
            brand_id: model.brand_id,
            dispensary_name: model.dispensary_name,
            amount_cents: model.amount_cents,
            status: model.status,
            order_date: model.order_date,
            monday_item_id: model.monday_item_id,
            monday_synced_at: model.monday_synced_at.map(Into::into),
            created_at: model.created_at.into(),
        }
    }
}

impl From<Order> for sale::ActiveModel {
    fn from(r: Order) -> Self {
        Self {
            id: Set(r.id),
            brand_id: Set(r.brand_id),
            dispensary_name: Set(r.dispensary_name),
            amount_cents: Set(r.amount_cents),
            status: Set(r.status),
            order_date: Set(r.order_date),
            monday_item_id: Set(r.monday_item_id),
            monday_synced_at: Set(r.monday_synced_at.map(Into::into)),
            created_at: Set(r.created_at.into()),
        }
    }
}

impl From<invoice::Model> for Invoice {
    fn from(model: invoice::Model) -> Self {
        Self {
            id: model.id,
            brand_id: model.brand_id,
            dispensary_name: model.dispensary_name,
            amount_cents: model.amount_cents,
            status: model.status,
            due_date: model.due_date,
            monday_item_id: model.monday_item_id,
            monday_synced_at: model.monday_synced_at.map(Into::into),
            created_at: model.created_at.into(),
        }
    }
}

impl From<Invoice> for invoice::ActiveModel {
    fn from(r: Invoice) -> Self {
        Self {
            id: Set(r.id),
            brand_id: Set(r.brand_id),
            dispensary_name: Set(r.dispensary_name),
            amount_cents: Set(r.amount_cents),
            status: Set(r.status),
            due_date: Set(r.due_date),
            monday_item_id: Set(r.monday_item_id),
            monday_synced_at: Set(r.monday_synced_at.map(Into::into)),
            created_at: Set(r.created_at.into()),
        }
    }
}

impl From<activation::Model> for Activation {
    fn from(model: activation::Model) -> Self {
        Self {
            id: model.id,
            brand_id: model.brand_id,
            store_name: model.store_name,
            activation_type: model.activation_type,
            activation_date: model.activation_date,
            monday_item_id: model.monday_item_id,
            monday_synced_at: model.monday_synced_at.map(Into::into),
            created_at: model.created_at.into(),
        }
    }
}

impl From<Activation> for activation::ActiveModel {
    fn from(r: Activation) -> Self {
        Self {
            id: Set(r.id),
            brand_id: Set(r.brand_id),
            store_name: Set(r.store_name),
            activation_type: Set(r.activation_type),
            activation_date: Set(r.activation_date),
            monday_item_id: Set(r.monday_item_id),
            monday_synced_at: Set(r.monday_synced_at.map(Into::into)),
            created_at: Set(r.created_at.into()),
        }
    }
}
