use crate::domain::repositories::brand_integration_repository::BrandIntegrationRepository;
use crate::domain::services::sync_log_service::SyncLogService;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 一轮裁剪的结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrimSummary {
    /// 参与裁剪的品牌数
    pub brands: usize,
    /// 删除的日志条数
    pub deleted: u64,
    /// 裁剪失败的品牌数
    pub failed: usize,
}

/// 同步日志清理工作器
///
/// 定期把每个品牌的审计日志裁剪到最新的 `retention` 条
pub struct SyncLogTrimWorker {
    integrations: Arc<dyn BrandIntegrationRepository>,
    sync_log: SyncLogService,
    retention: u64,
    interval: Duration,
}

impl SyncLogTrimWorker {
    pub fn new(
        integrations: Arc<dyn BrandIntegrationRepository>,
        sync_log: SyncLogService,
        retention: u64,
        interval: Duration,
    ) -> Self {
        Self {
            integrations,
            sync_log,
            retention,
            interval,
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!("Sync log trim worker started");

        let mut interval = tokio::time::interval(self.interval);

        loop {
            interval.tick().await;

            match self.trim_all_brands().await {
                Ok(summary) => {
                    if summary.failed > 0 {
                        error!(
                            "Sync log trim failed for {} of {} brands",
                            summary.failed, summary.brands
                        );
                    }
                    if summary.deleted > 0 {
                        info!("Trimmed {} old sync log entries", summary.deleted);
                    }
                }
                Err(e) => {
                    error!("Failed to trim sync logs: {:#}", e);
                }
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 裁剪所有品牌的日志
    ///
    /// 单个品牌失败不影响其它品牌，失败数计入结果
    pub async fn trim_all_brands(&self) -> anyhow::Result<TrimSummary> {
        let brand_ids = self.integrations.list_brand_ids().await?;

        let mut summary = TrimSummary {
            brands: brand_ids.len(),
            ..Default::default()
        };
        for brand_id in brand_ids {
            match self.sync_log.trim(&brand_id, self.retention).await {
                Ok(deleted) => summary.deleted += deleted,
                Err(e) => {
                    summary.failed += 1;
                    counter!("sync_log_trim_failures_total").increment(1);
                    warn!("Failed to trim sync logs for brand {}: {}", brand_id, e);
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "sync_log_trim_worker_test.rs"]
mod tests;
