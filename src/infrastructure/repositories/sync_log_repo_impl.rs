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

use crate::domain::models::sync_log::SyncLogEntry;
use crate::domain::repositories::local_record_repository::RepositoryError;
use crate::domain::repositories::sync_log_repository::SyncLogRepository;
use crate::infrastructure::database::entities::sync_log;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sea_orm::*;
use std::sync::Arc;

/// 同步日志仓库实现
///
/// 同一品牌的日志时间戳在本进程内严格递增，
/// 排序仍以自增 `id` 为准。
#[derive(Clone)]
pub struct SyncLogRepoImpl {
    db: Arc<DatabaseConnection>,
    last_timestamps: Arc<DashMap<String, DateTime<Utc>>>,
}

impl SyncLogRepoImpl {
    /// 创建新的同步日志仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            last_timestamps: Arc::new(DashMap::new()),
        }
    }

    fn next_timestamp(&self, brand_id: &str, candidate: DateTime<Utc>) -> DateTime<Utc> {
        let mut last = self
            .last_timestamps
            .entry(brand_id.to_string())
            .or_insert(DateTime::<Utc>::MIN_UTC);
        let timestamp = if candidate > *last {
            candidate
        } else {
            *last + Duration::microseconds(1)
        };
        *last = timestamp;
        timestamp
    }
}

#[async_trait]
impl SyncLogRepository for SyncLogRepoImpl {
    async fn append(&self, entry: &SyncLogEntry) -> Result<SyncLogEntry, RepositoryError> {
        let timestamp = self.next_timestamp(&entry.brand_id, entry.timestamp);

        let active_model = sync_log::ActiveModel {
            id: NotSet,
            brand_id: Set(entry.brand_id.clone()),
            direction: Set(entry.direction.to_string()),
            action: Set(entry.action.to_string()),
            success: Set(entry.success),
            details: Set(entry.details.clone()),
            error: Set(entry.error.clone()),
            timestamp: Set(timestamp.into()),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        SyncLogEntry::try_from(model)
    }

    async fn recent(
        &self,
        brand_id: &str,
        limit: u64,
    ) -> Result<Vec<SyncLogEntry>, RepositoryError> {
        let models = sync_log::Entity::find()
            .filter(sync_log::Column::BrandId.eq(brand_id))
            .order_by_desc(sync_log::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        models.into_iter().map(SyncLogEntry::try_from).collect()
    }

    async fn trim(&self, brand_id: &str, keep: u64) -> Result<u64, RepositoryError> {
        // Newest entry that falls outside the retention window; SQLite has
        // no OFFSET without LIMIT, so fetch exactly that one id.
        let cutoff: Option<i64> = sync_log::Entity::find()
            .select_only()
            .column(sync_log::Column::Id)
            .filter(sync_log::Column::BrandId.eq(brand_id))
            .order_by_desc(sync_log::Column::Id)
            .offset(keep)
            .limit(1)
            .into_tuple()
            .one(self.db.as_ref())
            .await?;

        let Some(cutoff) = cutoff else {
            return Ok(0);
        };

        let result = sync_log::Entity::delete_many()
            .filter(sync_log::Column::BrandId.eq(brand_id))
            .filter(sync_log::Column::Id.lte(cutoff))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn count(&self, brand_id: &str) -> Result<u64, RepositoryError> {
        let count = sync_log::Entity::find()
            .filter(sync_log::Column::BrandId.eq(brand_id))
            .count(self.db.as_ref())
            .await?;
        Ok(count)
    }
}

impl TryFrom<sync_log::Model> for SyncLogEntry {
    type Error = RepositoryError;

    fn try_from(model: sync_log::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            brand_id: model.brand_id,
            direction: model.direction.parse().map_err(RepositoryError::InvalidData)?,
            action: model.action.parse().map_err(RepositoryError::InvalidData)?,
            success: model.success,
            details: model.details,
            error: model.error,
            timestamp: model.timestamp.into(),
        })
    }
}
