// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::services::rate_limiting_service::{
    RateLimitConfig, RateLimitingError, Reservoir,
};
use crate::infrastructure::cache::redis_client::RedisClient;

/// 进程内令牌池
///
/// 基于公平信号量：每次调用消耗一个许可，补充任务按周期把许可补回容量上限。
/// 适用于单实例部署。
pub struct InMemoryReservoir {
    permits: Arc<Semaphore>,
    refill: JoinHandle<()>,
}

impl InMemoryReservoir {
    /// 创建令牌池并启动补充任务
    ///
    /// 必须在 tokio 运行时内调用
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = config.reservoir as usize;
        let permits = Arc::new(Semaphore::new(capacity));
        let refill = tokio::spawn(Self::refill_loop(
            Arc::downgrade(&permits),
            capacity,
            config.refresh_interval,
        ));
        Self { permits, refill }
    }

    /// 当前可用令牌数
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    async fn refill_loop(permits: Weak<Semaphore>, capacity: usize, period: Duration) {
        let start = tokio::time::Instant::now() + period;
        let mut interval = tokio::time::interval_at(start, period);
        loop {
            interval.tick().await;
            let Some(permits) = permits.upgrade() else {
                break;
            };
            let missing = capacity.saturating_sub(permits.available_permits());
            if missing > 0 {
                debug!("Refilling reservoir with {} permits", missing);
                permits.add_permits(missing);
            }
        }
    }
}

impl Drop for InMemoryReservoir {
    fn drop(&mut self) {
        self.refill.abort();
    }
}

#[async_trait]
impl Reservoir for InMemoryReservoir {
    async fn acquire(&self) -> Result<(), RateLimitingError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| RateLimitingError::Closed)?;
        // 许可只由补充任务归还
        permit.forget();
        Ok(())
    }
}

/// Redis 共享令牌池
///
/// 固定窗口计数（INCR + PEXPIRE），多个实例共享同一配额。
/// 窗口耗尽时等待键过期后重试。
pub struct RedisReservoir {
    redis: Arc<RedisClient>,
    key: String,
    config: RateLimitConfig,
}

impl RedisReservoir {
    pub fn new(redis: Arc<RedisClient>, key_prefix: &str, config: RateLimitConfig) -> Self {
        Self {
            redis,
            key: format!("{}:monday:reservoir", key_prefix),
            config,
        }
    }

    fn window_millis(&self) -> i64 {
        self.config.refresh_interval.as_millis().max(1) as i64
    }
}

#[async_trait]
impl Reservoir for RedisReservoir {
    async fn acquire(&self) -> Result<(), RateLimitingError> {
        loop {
            let count = self
                .redis
                .incr(&self.key)
                .await
                .map_err(|e| RateLimitingError::Backend(e.to_string()))?;

            if count == 1 {
                self.redis
                    .pexpire(&self.key, self.window_millis())
                    .await
                    .map_err(|e| RateLimitingError::Backend(e.to_string()))?;
            }

            if count <= i64::from(self.config.reservoir) {
                return Ok(());
            }

            let ttl = self
                .redis
                .pttl(&self.key)
                .await
                .map_err(|e| RateLimitingError::Backend(e.to_string()))?;

            let wait = if ttl > 0 {
                ttl
            } else {
                // 键缺少过期时间时补上，避免永久阻塞
                if ttl == -1 {
                    warn!("Reservoir key {} had no expiry, resetting window", self.key);
                    self.redis
                        .pexpire(&self.key, self.window_millis())
                        .await
                        .map_err(|e| RateLimitingError::Backend(e.to_string()))?;
                }
                10
            };
            debug!("Shared reservoir exhausted, waiting {} ms", wait);
            tokio::time::sleep(Duration::from_millis(wait as u64)).await;
        }
    }
}
