// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::local_record_repository::RepositoryError;
use crate::domain::models::local_record::RecordRef;
use crate::domain::models::sync_intent::SyncIntent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 同步发件箱仓库特质
#[async_trait]
pub trait SyncIntentRepository: Send + Sync {
    /// 创建同步意图
    async fn create(&self, intent: &SyncIntent) -> Result<SyncIntent, RepositoryError>;
    /// 根据ID查找同步意图
    async fn find_by_id(&self, id: Uuid) -> Result<Option<SyncIntent>, RepositoryError>;
    /// 查找到期的待投递或失败意图
    async fn find_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<SyncIntent>, RepositoryError>;
    /// 查找同一记录尚未完成（待投递或失败待重试）的意图
    async fn find_open(
        &self,
        brand_id: &str,
        record: RecordRef,
    ) -> Result<Option<SyncIntent>, RepositoryError>;
    /// 更新同步意图
    async fn update(&self, intent: &SyncIntent) -> Result<SyncIntent, RepositoryError>;
}
