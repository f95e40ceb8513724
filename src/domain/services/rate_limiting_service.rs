// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// 限流配置
///
/// 固定容量的令牌池，每个周期整体补满（非滑动窗口）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// 每个周期允许的请求数
    pub reservoir: u32,
    /// 补满周期
    pub refresh_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            reservoir: 50,
            refresh_interval: Duration::from_secs(60),
        }
    }
}

/// 限流错误
#[derive(Error, Debug)]
pub enum RateLimitingError {
    /// 令牌池已关闭
    #[error("Reservoir closed")]
    Closed,
    /// 共享计数器（Redis）错误
    #[error("Reservoir backend error: {0}")]
    Backend(String),
}

/// 令牌池特质
///
/// `acquire` 在令牌耗尽时等待下一次补满，从不丢弃请求。
#[async_trait]
pub trait Reservoir: Send + Sync {
    /// 取得一个令牌
    async fn acquire(&self) -> Result<(), RateLimitingError>;
}

/// 出站调用限流器
///
/// 所有 Monday.com 调用共享同一个全局配额。
/// 排队的调用按先进先出的顺序放行。
#[derive(Clone)]
pub struct RateLimiter {
    reservoir: Arc<dyn Reservoir>,
    // 串行化取令牌，保证等待者按到达顺序放行
    queue: Arc<Mutex<()>>,
}

impl RateLimiter {
    pub fn new(reservoir: Arc<dyn Reservoir>) -> Self {
        Self {
            reservoir,
            queue: Arc::new(Mutex::new(())),
        }
    }

    /// 等待令牌后执行任务
    ///
    /// 任务本身不持有队列锁，多个已放行的任务可以并发执行。
    pub async fn schedule<T, Fut>(&self, task: Fut) -> Result<T, RateLimitingError>
    where
        Fut: Future<Output = T>,
    {
        {
            let _turn = self.queue.lock().await;
            self.reservoir.acquire().await?;
        }
        Ok(task.await)
    }
}
