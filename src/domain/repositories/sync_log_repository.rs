// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::local_record_repository::RepositoryError;
use crate::domain::models::sync_log::SyncLogEntry;
use async_trait::async_trait;

/// 同步日志仓库特质
///
/// 日志只追加，按 `id` 排序
#[async_trait]
pub trait SyncLogRepository: Send + Sync {
    /// 追加一条日志，返回带ID的条目
    async fn append(&self, entry: &SyncLogEntry) -> Result<SyncLogEntry, RepositoryError>;
    /// 品牌最新的日志，新的在前
    async fn recent(&self, brand_id: &str, limit: u64)
        -> Result<Vec<SyncLogEntry>, RepositoryError>;
    /// 只保留品牌最新的 `keep` 条日志，返回删除条数
    async fn trim(&self, brand_id: &str, keep: u64) -> Result<u64, RepositoryError>;
    /// 品牌日志总数
    async fn count(&self, brand_id: &str) -> Result<u64, RepositoryError>;
}
