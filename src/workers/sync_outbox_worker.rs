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

use crate::config::settings::OutboxSettings;
use crate::domain::models::local_record::RecordRef;
use crate::domain::models::sync_intent::{SyncIntent, SyncIntentStatus};
use crate::domain::repositories::sync_intent_repository::SyncIntentRepository;
use crate::domain::services::sync_service::SyncService;
use chrono::Utc;
use futures::StreamExt;
use metrics::counter;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// 退避指数上限，避免溢出
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// 发件箱工作器
///
/// 轮询到期的同步意图并调用出站同步，至少投递一次。
#[derive(Clone)]
pub struct SyncOutboxWorker {
    /// 发件箱仓库
    repo: Arc<dyn SyncIntentRepository>,
    /// 出站同步服务
    sync_service: SyncService,
    /// 轮询间隔
    poll_interval: Duration,
    /// 每批条数
    batch_size: u64,
    /// 并发投递数
    concurrency: usize,
}

impl SyncOutboxWorker {
    /// 创建新的发件箱工作器实例
    ///
    /// # 参数
    ///
    /// * `repo` - 发件箱仓库
    /// * `sync_service` - 出站同步服务
    /// * `settings` - 轮询和并发配置
    pub fn new(
        repo: Arc<dyn SyncIntentRepository>,
        sync_service: SyncService,
        settings: &OutboxSettings,
    ) -> Self {
        Self {
            repo,
            sync_service,
            poll_interval: Duration::from_secs(settings.poll_interval_secs),
            batch_size: settings.batch_size,
            concurrency: settings.concurrency,
        }
    }

    /// 运行发件箱工作器
    pub async fn run(&self) {
        info!("Sync outbox worker started");
        loop {
            if let Err(e) = self.process_due_intents().await {
                error!("Error processing sync outbox: {}", e);
            }
            sleep(self.poll_interval).await;
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 处理一批到期的同步意图
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 本批处理的条数
    /// * `Err(anyhow::Error)` - 读取发件箱失败
    pub async fn process_due_intents(&self) -> anyhow::Result<usize> {
        let intents = self.repo.find_due(Utc::now(), self.batch_size).await?;

        if intents.is_empty() {
            return Ok(0);
        }

        let count = intents.len();
        info!("Processing {} due sync intents", count);

        let worker = self;
        futures::stream::iter(group_by_record(intents))
            .for_each_concurrent(self.concurrency, |group| {
                let w = worker;
                async move {
                    // Same record: one at a time, so a later intent sees the item id
                    for intent in group {
                        let id = intent.id;
                        if let Err(e) = w.deliver(intent).await {
                            error!("Failed to record delivery of sync intent {}: {}", id, e);
                        }
                    }
                }
            })
            .await;

        Ok(count)
    }

    async fn deliver(&self, mut intent: SyncIntent) -> anyhow::Result<()> {
        let record = RecordRef::new(intent.entity_type, intent.entity_id);
        let outcome = self
            .sync_service
            .sync_record(&intent.brand_id, record)
            .await;

        if outcome.success {
            intent.status = SyncIntentStatus::Delivered;
            intent.attempt_count += 1;
            intent.delivered_at = Some(Utc::now());
            intent.next_attempt_at = None;
            intent.last_error = None;
            self.repo.update(&intent).await?;
            counter!("sync_outbox_delivered_total").increment(1);
            info!("Sync intent {} delivered", intent.id);
        } else {
            intent.last_error = outcome.error;
            self.handle_failure(intent).await?;
        }

        Ok(())
    }

    async fn handle_failure(&self, mut intent: SyncIntent) -> anyhow::Result<()> {
        if intent.is_last_attempt() {
            intent.status = SyncIntentStatus::Dead;
            intent.attempt_count += 1;
            intent.next_attempt_at = None;
            warn!(
                "Sync intent {} moved to dead letter state after {} attempts",
                intent.id, intent.attempt_count
            );
            counter!("sync_outbox_dead_total").increment(1);
        } else {
            intent.status = SyncIntentStatus::Failed;
            intent.attempt_count += 1;

            // Exponential backoff with jitter
            let exponent = (intent.attempt_count.max(0) as u32).min(MAX_BACKOFF_EXPONENT);
            let base_backoff = 2u64.pow(exponent);
            let jitter = rand::rng().random_range(0..=base_backoff / 2);
            let backoff = base_backoff + jitter;

            intent.next_attempt_at = Some(Utc::now() + chrono::Duration::seconds(backoff as i64));
        }

        self.repo.update(&intent).await?;
        Ok(())
    }
}

/// 按品牌和记录分组，保持批内原有顺序
fn group_by_record(intents: Vec<SyncIntent>) -> Vec<Vec<SyncIntent>> {
    let mut groups: Vec<Vec<SyncIntent>> = Vec::new();
    let mut index: HashMap<(String, RecordRef), usize> = HashMap::new();

    for intent in intents {
        let key = (
            intent.brand_id.clone(),
            RecordRef::new(intent.entity_type, intent.entity_id),
        );
        match index.get(&key) {
            Some(&i) => groups[i].push(intent),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![intent]);
            }
        }
    }

    groups
}
