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

use crate::domain::models::local_record::RecordRef;
use crate::domain::models::sync_intent::{SyncIntent, SyncIntentStatus};
use crate::domain::repositories::local_record_repository::RepositoryError;
use crate::domain::repositories::sync_intent_repository::SyncIntentRepository;
use crate::infrastructure::database::entities::sync_intent::{self, SeaSyncIntentStatus};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

impl From<SyncIntentStatus> for SeaSyncIntentStatus {
    fn from(status: SyncIntentStatus) -> Self {
        match status {
            SyncIntentStatus::Pending => SeaSyncIntentStatus::Pending,
            SyncIntentStatus::Delivered => SeaSyncIntentStatus::Delivered,
            SyncIntentStatus::Failed => SeaSyncIntentStatus::Failed,
            SyncIntentStatus::Dead => SeaSyncIntentStatus::Dead,
        }
    }
}

impl From<SeaSyncIntentStatus> for SyncIntentStatus {
    fn from(status: SeaSyncIntentStatus) -> Self {
        match status {
            SeaSyncIntentStatus::Pending => SyncIntentStatus::Pending,
            SeaSyncIntentStatus::Delivered => SyncIntentStatus::Delivered,
            SeaSyncIntentStatus::Failed => SyncIntentStatus::Failed,
            SeaSyncIntentStatus::Dead => SyncIntentStatus::Dead,
        }
    }
}

/// 同步发件箱仓库实现
#[derive(Clone)]
pub struct SyncIntentRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl SyncIntentRepoImpl {
    /// 创建新的同步发件箱仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SyncIntentRepository for SyncIntentRepoImpl {
    async fn create(&self, intent: &SyncIntent) -> Result<SyncIntent, RepositoryError> {
        sync_intent::Entity::insert(sync_intent::ActiveModel::from(intent.clone()))
            .exec(self.db.as_ref())
            .await?;

        Ok(intent.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SyncIntent>, RepositoryError> {
        let model = sync_intent::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        model.map(SyncIntent::try_from).transpose()
    }

    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<SyncIntent>, RepositoryError> {
        let now: DateTime<FixedOffset> = now.into();

        let models = sync_intent::Entity::find()
            .filter(
                Condition::any()
                    .add(sync_intent::Column::Status.eq(SeaSyncIntentStatus::Pending))
                    .add(sync_intent::Column::Status.eq(SeaSyncIntentStatus::Failed)),
            )
            .filter(
                Condition::any()
                    .add(sync_intent::Column::NextAttemptAt.is_null())
                    .add(sync_intent::Column::NextAttemptAt.lte(now)),
            )
            .order_by_asc(sync_intent::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        models.into_iter().map(SyncIntent::try_from).collect()
    }

    async fn find_open(
        &self,
        brand_id: &str,
        record: RecordRef,
    ) -> Result<Option<SyncIntent>, RepositoryError> {
        let model = sync_intent::Entity::find()
            .filter(sync_intent::Column::BrandId.eq(brand_id))
            .filter(sync_intent::Column::EntityType.eq(record.entity_type.to_string()))
            .filter(sync_intent::Column::EntityId.eq(record.id))
            .filter(
                Condition::any()
                    .add(sync_intent::Column::Status.eq(SeaSyncIntentStatus::Pending))
                    .add(sync_intent::Column::Status.eq(SeaSyncIntentStatus::Failed)),
            )
            .order_by_asc(sync_intent::Column::CreatedAt)
            .one(self.db.as_ref())
            .await?;

        model.map(SyncIntent::try_from).transpose()
    }

    async fn update(&self, intent: &SyncIntent) -> Result<SyncIntent, RepositoryError> {
        let mut active: sync_intent::ActiveModel = sync_intent::Entity::find_by_id(intent.id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();

        active.status = Set(intent.status.into());
        active.attempt_count = Set(intent.attempt_count);
        active.next_attempt_at = Set(intent.next_attempt_at.map(Into::into));
        active.last_error = Set(intent.last_error.clone());
        active.updated_at = Set(Utc::now().into());
        active.delivered_at = Set(intent.delivered_at.map(Into::into));

        let updated_model = active.update(self.db.as_ref()).await?;

        SyncIntent::try_from(updated_model)
    }
}

impl TryFrom<sync_intent::Model> for SyncIntent {
    type Error = RepositoryError;

    fn try_from(model: sync_intent::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            brand_id: model.brand_id,
            entity_type: model
                .entity_type
                .parse()
                .map_err(RepositoryError::InvalidData)?,
            entity_id: model.entity_id,
            status: model.status.into(),
            attempt_count: model.attempt_count,
            max_attempts: model.max_attempts,
            next_attempt_at: model.next_attempt_at.map(Into::into),
            last_error: model.last_error,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            delivered_at: model.delivered_at.map(Into::into),
        })
    }
}

impl From<SyncIntent> for sync_intent::ActiveModel {
    fn from(intent: SyncIntent) -> Self {
        Self {
            id: Set(intent.id),
            brand_id: Set(intent.brand_id),
            entity_type: Set(intent.entity_type.to_string()),
            entity_id: Set(intent.entity_id),
            status: Set(intent.status.into()),
            attempt_count: Set(intent.attempt_count),
            max_attempts: Set(intent.max_attempts),
            next_attempt_at: Set(intent.next_attempt_at.map(Into::into)),
            last_error: Set(intent.last_error),
            created_at: Set(intent.created_at.into()),
            updated_at: Set(intent.updated_at.into()),
            delivered_at: Set(intent.delivered_at.map(Into::into)),
        }
    }
}
