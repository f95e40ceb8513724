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

use crate::domain::models::brand_integration::{BoardIds, BrandIntegrationSettings, LastSync};
use crate::domain::repositories::brand_integration_repository::BrandIntegrationRepository;
use crate::domain::repositories::local_record_repository::RepositoryError;
use crate::infrastructure::database::entities::brand_integration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::sync::Arc;

/// 品牌集成设置仓库实现
#[derive(Clone)]
pub struct BrandIntegrationRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl BrandIntegrationRepoImpl {
    /// 创建新的品牌集成设置仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn load(&self, brand_id: &str) -> Result<brand_integration::Model, RepositoryError> {
        brand_integration::Entity::find_by_id(brand_id.to_string())
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl BrandIntegrationRepository for BrandIntegrationRepoImpl {
    async fn find(
        &self,
        brand_id: &str,
    ) -> Result<Option<BrandIntegrationSettings>, RepositoryError> {
        let model = brand_integration::Entity::find_by_id(brand_id.to_string())
            .one(self.db.as_ref())
            .await?;

        model.map(BrandIntegrationSettings::try_from).transpose()
    }

    async fn upsert(
        &self,
        settings: &BrandIntegrationSettings,
    ) -> Result<BrandIntegrationSettings, RepositoryError> {
        let existing = brand_integration::Entity::find_by_id(settings.brand_id.clone())
            .one(self.db.as_ref())
            .await?;

        let (last_sync_at, last_sync_success, last_sync_action) = match &settings.last_sync {
            Some(last) => (
                Some(last.timestamp.into()),
                Some(last.success),
                Some(last.action.to_string()),
            ),
            None => (None, None, None),
        };

        let active_model = brand_integration::ActiveModel {
            brand_id: Set(settings.brand_id.clone()),
            api_token: Set(settings.api_token.clone()),
            leads_board_id: Set(settings.board_ids.leads.clone()),
            orders_board_id: Set(settings.board_ids.orders.clone()),
            invoices_board_id: Set(settings.board_ids.invoices.clone()),
            activations_board_id: Set(settings.board_ids.activations.clone()),
            accounts_board_id: Set(settings.board_ids.accounts.clone()),
            last_sync_at: Set(last_sync_at),
            last_sync_success: Set(last_sync_success),
            last_sync_action: Set(last_sync_action),
            webhook_verified_at: Set(settings.webhook_verified_at.map(Into::into)),
            updated_at: Set(Utc::now().into()),
        };

        let model = if existing.is_some() {
            active_model.update(self.db.as_ref()).await?
        } else {
            active_model.insert(self.db.as_ref()).await?
        };

        BrandIntegrationSettings::try_from(model)
    }

    async fn update_last_sync(
        &self,
        brand_id: &str,
        last_sync: &LastSync,
    ) -> Result<(), RepositoryError> {
        let mut active_model: brand_integration::ActiveModel = self.load(brand_id).await?.into();
        active_model.last_sync_at = Set(Some(last_sync.timestamp.into()));
        active_model.last_sync_success = Set(Some(last_sync.success));
        active_model.last_sync_action = Set(Some(last_sync.action.to_string()));
        active_model.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn mark_webhook_verified(
        &self,
        brand_id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut active_model: brand_integration::ActiveModel = self.load(brand_id).await?.into();
        active_model.webhook_verified_at = Set(Some(verified_at.into()));
        active_model.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn list_brand_ids(&self) -> Result<Vec<String>, RepositoryError> {
        let ids = brand_integration::Entity::find()
            .select_only()
            .column(brand_integration::Column::BrandId)
            .order_by_asc(brand_integration::Column::BrandId)
            .into_tuple::<String>()
            .all(self.db.as_ref())
            .await?;
        Ok(ids)
    }
}

impl TryFrom<brand_integration::Model> for BrandIntegrationSettings {
    type Error = RepositoryError;

    fn try_from(model: brand_integration::Model) -> Result<Self, Self::Error> {
        let last_sync = match (
            model.last_sync_at,
            model.last_sync_success,
            model.last_sync_action,
        ) {
            (Some(timestamp), Some(success), Some(action)) => Some(LastSync {
                timestamp: timestamp.into(),
                success,
                action: action.parse().map_err(RepositoryError::InvalidData)?,
            }),
            _ => None,
        };

        Ok(Self {
            brand_id: model.brand_id,
            api_token: model.api_token,
            board_ids: BoardIds {
                leads: model.leads_board_id,
                orders: model.orders_board_id,
                invoices: model.invoices_board_id,
                activations: model.activations_board_id,
                accounts: model.accounts_board_id,
            },
            last_sync,
            webhook_verified_at: model.webhook_verified_at.map(Into::into),
            updated_at: model.updated_at.into(),
        })
    }
}
