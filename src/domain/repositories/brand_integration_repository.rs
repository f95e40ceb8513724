// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::local_record_repository::RepositoryError;
use crate::domain::models::brand_integration::{BrandIntegrationSettings, LastSync};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// 品牌集成设置仓库特质
#[async_trait]
pub trait BrandIntegrationRepository: Send + Sync {
    /// 查找品牌的集成设置
    async fn find(&self, brand_id: &str)
        -> Result<Option<BrandIntegrationSettings>, RepositoryError>;
    /// 保存集成设置（不存在则创建）
    async fn upsert(
        &self,
        settings: &BrandIntegrationSettings,
    ) -> Result<BrandIntegrationSettings, RepositoryError>;
    /// 更新最近一次同步摘要
    async fn update_last_sync(
        &self,
        brand_id: &str,
        last_sync: &LastSync,
    ) -> Result<(), RepositoryError>;
    /// 记录 webhook 握手时间
    async fn mark_webhook_verified(
        &self,
        brand_id: &str,
        verified_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    /// 列出所有有集成记录的品牌
    async fn list_brand_ids(&self) -> Result<Vec<String>, RepositoryError>;
}
