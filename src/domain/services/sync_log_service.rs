// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, error};

use crate::domain::models::sync_log::SyncLogEntry;
use crate::domain::repositories::local_record_repository::RepositoryError;
use crate::domain::repositories::sync_log_repository::SyncLogRepository;

/// 同步审计日志服务
///
/// 写日志失败只记录错误，不影响调用方的同步结果。
#[derive(Clone)]
pub struct SyncLogService {
    repo: Arc<dyn SyncLogRepository>,
}

impl SyncLogService {
    pub fn new(repo: Arc<dyn SyncLogRepository>) -> Self {
        Self { repo }
    }

    /// 追加一条日志
    pub async fn record(&self, entry: SyncLogEntry) {
        match self.repo.append(&entry).await {
            Ok(saved) => debug!(
                "Sync log {} written for brand {} ({} {})",
                saved.id, saved.brand_id, saved.direction, saved.action
            ),
            Err(e) => error!(
                "Failed to write sync log for brand {} ({}): {}",
                entry.brand_id, entry.action, e
            ),
        }
    }

    /// 品牌最近的日志，新的在前
    pub async fn history(
        &self,
        brand_id: &str,
        limit: u64,
    ) -> Result<Vec<SyncLogEntry>, RepositoryError> {
        self.repo.recent(brand_id, limit).await
    }

    /// 删除品牌超出保留条数的旧日志
    pub async fn trim(&self, brand_id: &str, keep: u64) -> Result<u64, RepositoryError> {
        let deleted = self.repo.trim(brand_id, keep).await?;
        if deleted > 0 {
            counter!("sync_log_trimmed_total").increment(deleted);
        }
        Ok(deleted)
    }
}
