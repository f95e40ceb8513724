// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::brand_integration::LastSync;
use crate::domain::models::local_record::{EntityType, RecordRef};
use crate::domain::models::sync_log::SyncLogEntry;
use crate::domain::repositories::brand_integration_repository::BrandIntegrationRepository;
use crate::domain::repositories::local_record_repository::{
    LocalRecordRepository, RepositoryError,
};
use crate::domain::services::column_mapping::{
    render_column_values, ColumnMappingError, COLUMN_MAPPING_VERSION,
};
use crate::domain::services::monday_api::{MondayApi, MondayApiError};
use crate::domain::services::sync_log_service::SyncLogService;

/// 出站同步错误
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Monday.com is not connected for brand {0}")]
    NotConnected(String),
    #[error("No Monday.com board configured for {0} records")]
    BoardNotConfigured(EntityType),
    #[error("{0} not found")]
    RecordNotFound(RecordRef),
    #[error("{0} does not belong to brand {1}")]
    BrandMismatch(RecordRef, String),
    #[error("Column mapping error: {0}")]
    Mapping(#[from] ColumnMappingError),
    #[error(transparent)]
    Api(#[from] MondayApiError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 一次出站同步的结果
///
/// 同步失败不作为错误返回，调用方只看 `success`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub success: bool,
    pub monday_item_id: Option<String>,
    pub error: Option<String>,
}

impl SyncOutcome {
    fn synced(monday_item_id: String) -> Self {
        Self {
            success: true,
            monday_item_id: Some(monday_item_id),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            monday_item_id: None,
            error: Some(error),
        }
    }
}

/// 出站同步服务
///
/// 把本地记录推送为 Monday.com 看板条目。
/// 每次尝试都写一条审计日志并更新品牌的 `last_sync`。
#[derive(Clone)]
pub struct SyncService {
    records: Arc<dyn LocalRecordRepository>,
    integrations: Arc<dyn BrandIntegrationRepository>,
    monday: Arc<dyn MondayApi>,
    sync_log: SyncLogService,
}

impl SyncService {
    pub fn new(
        records: Arc<dyn LocalRecordRepository>,
        integrations: Arc<dyn BrandIntegrationRepository>,
        monday: Arc<dyn MondayApi>,
        sync_log: SyncLogService,
    ) -> Self {
        Self {
            records,
            integrations,
            monday,
            sync_log,
        }
    }

    /// 同步线索
    pub async fn sync_lead(&self, brand_id: &str, lead_id: Uuid) -> SyncOutcome {
        self.sync_record(brand_id, RecordRef::new(EntityType::Lead, lead_id))
            .await
    }

    /// 同步订单
    pub async fn sync_order(&self, brand_id: &str, order_id: Uuid) -> SyncOutcome {
        self.sync_record(brand_id, RecordRef::new(EntityType::Order, order_id))
            .await
    }

    /// 同步发票
    pub async fn sync_invoice(&self, brand_id: &str, invoice_id: Uuid) -> SyncOutcome {
        self.sync_record(brand_id, RecordRef::new(EntityType::Invoice, invoice_id))
            .await
    }

    /// 同步门店活动
    pub async fn sync_activation(&self, brand_id: &str, activation_id: Uuid) -> SyncOutcome {
        self.sync_record(
            brand_id,
            RecordRef::new(EntityType::Activation, activation_id),
        )
        .await
    }

    /// 把线索作为客户同步到 Accounts 看板
    pub async fn sync_account(&self, brand_id: &str, lead_id: Uuid) -> SyncOutcome {
        self.sync_record(brand_id, RecordRef::new(EntityType::Account, lead_id))
            .await
    }

    /// 同步任意类型的本地记录
    pub async fn sync_record(&self, brand_id: &str, record_ref: RecordRef) -> SyncOutcome {
        let action = record_ref.entity_type.sync_action();
        let entity_key = record_ref.entity_type.details_key();

        let (outcome, entry) = match self.push(brand_id, record_ref).await {
            Ok(item_id) => {
                info!(
                    "Synced {} for brand {} to Monday.com item {}",
                    record_ref, brand_id, item_id
                );
                let entry = SyncLogEntry::outbound(
                    brand_id,
                    action,
                    true,
                    json!({
                        entity_key: record_ref.id,
                        "mondayItemId": item_id,
                        "mappingVersion": COLUMN_MAPPING_VERSION,
                    }),
                    None,
                );
                (SyncOutcome::synced(item_id), entry)
            }
            Err(e) => {
                error!("Failed to sync {} for brand {}: {}", record_ref, brand_id, e);
                let message = e.to_string();
                let entry = SyncLogEntry::outbound(
                    brand_id,
                    action,
                    false,
                    json!({ entity_key: record_ref.id }),
                    Some(message.clone()),
                );
                (SyncOutcome::failed(message), entry)
            }
        };

        let result = if outcome.success { "success" } else { "failure" };
        counter!("monday_sync_total", "action" => action.as_str(), "result" => result)
            .increment(1);

        let last_sync = LastSync {
            timestamp: entry.timestamp,
            success: outcome.success,
            action,
        };
        self.sync_log.record(entry).await;
        self.update_last_sync(brand_id, &last_sync).await;

        outcome
    }

    async fn push(&self, brand_id: &str, record_ref: RecordRef) -> Result<String, SyncError> {
        let settings = self
            .integrations
            .find(brand_id)
            .await?
            .filter(|s| s.is_connected())
            .ok_or_else(|| SyncError::NotConnected(brand_id.to_string()))?;
        let token = settings
            .token()
            .ok_or_else(|| SyncError::NotConnected(brand_id.to_string()))?;
        let board_id = settings
            .board_ids
            .for_entity(record_ref.entity_type)
            .ok_or(SyncError::BoardNotConfigured(record_ref.entity_type))?;

        let record = self
            .records
            .find(record_ref)
            .await?
            .ok_or(SyncError::RecordNotFound(record_ref))?;
        if record.brand_id() != brand_id {
            return Err(SyncError::BrandMismatch(record_ref, brand_id.to_string()));
        }

        let column_values: Value = render_column_values(&record)?;

        let item_id = match record.monday_item_id() {
            Some(existing) => {
                self.monday
                    .change_multiple_column_values(token, board_id, existing, &column_values)
                    .await?
            }
            None => {
                self.monday
                    .create_item(token, board_id, &record.item_name(), &column_values)
                    .await?
            }
        };

        self.records
            .mark_synced(record_ref, &item_id, Utc::now())
            .await?;

        Ok(item_id)
    }

    async fn update_last_sync(&self, brand_id: &str, last_sync: &LastSync) {
        match self.integrations.update_last_sync(brand_id, last_sync).await {
            Ok(()) | Err(RepositoryError::NotFound) => {}
            Err(e) => warn!("Failed to update last sync for brand {}: {}", brand_id, e),
        }
    }
}
