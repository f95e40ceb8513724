// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::models::local_record::{EntityType, RecordRef};
use crate::domain::models::sync_intent::SyncIntent;
use crate::domain::repositories::brand_integration_repository::BrandIntegrationRepository;
use crate::domain::repositories::local_record_repository::{
    LocalRecordRepository, RepositoryError,
};
use crate::domain::repositories::sync_intent_repository::SyncIntentRepository;

/// 同步发件箱服务
///
/// 远程调用之前先把同步意图写入发件箱，由后台工作器投递。
/// 每条记录同一时间最多只有一个未完成的意图。
#[derive(Clone)]
pub struct SyncOutboxService {
    intents: Arc<dyn SyncIntentRepository>,
    records: Arc<dyn LocalRecordRepository>,
    integrations: Arc<dyn BrandIntegrationRepository>,
    max_attempts: i32,
}

impl SyncOutboxService {
    pub fn new(
        intents: Arc<dyn SyncIntentRepository>,
        records: Arc<dyn LocalRecordRepository>,
        integrations: Arc<dyn BrandIntegrationRepository>,
        max_attempts: i32,
    ) -> Self {
        Self {
            intents,
            records,
            integrations,
            max_attempts,
        }
    }

    /// 写入一条待投递的同步意图
    ///
    /// 同一记录已有待投递或待重试的意图时直接返回该意图
    pub async fn enqueue(
        &self,
        brand_id: &str,
        entity_type: EntityType,
        entity_id: Uuid,
    ) -> Result<SyncIntent, RepositoryError> {
        let record = RecordRef::new(entity_type, entity_id);
        if let Some(open) = self.intents.find_open(brand_id, record).await? {
            debug!(
                "Sync intent {} already open for {} (brand {})",
                open.id, record, brand_id
            );
            return Ok(open);
        }

        let intent = SyncIntent::new(brand_id, entity_type, entity_id, self.max_attempts);
        let intent = self.intents.create(&intent).await?;
        info!(
            "Queued sync intent {} for {} (brand {})",
            intent.id, record, brand_id
        );
        Ok(intent)
    }

    /// 为品牌所有尚未同步的记录写入同步意图
    ///
    /// 只覆盖已配置看板的实体类型，未连接的品牌不写入任何意图
    pub async fn enqueue_full_sync(
        &self,
        brand_id: &str,
    ) -> Result<Vec<SyncIntent>, RepositoryError> {
        let Some(settings) = self
            .integrations
            .find(brand_id)
            .await?
            .filter(|s| s.is_connected())
        else {
            info!("Full sync skipped, brand {} is not connected", brand_id);
            return Ok(Vec::new());
        };

        let mut pending: Vec<RecordRef> = Vec::new();
        for entity_type in EntityType::ALL {
            if settings.board_ids.for_entity(entity_type).is_none() {
                continue;
            }
            pending.extend(self.records.find_unsynced(brand_id, entity_type).await?);
        }

        let mut intents = Vec::with_capacity(pending.len());
        for record in pending {
            intents.push(self.enqueue(brand_id, record.entity_type, record.id).await?);
        }

        info!(
            "Full sync for brand {} queued {} records",
            brand_id,
            intents.len()
        );
        Ok(intents)
    }
}
