// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use brandsync::domain::services::rate_limiting_service::{
    RateLimitConfig, RateLimiter, Reservoir,
};
use brandsync::infrastructure::cache::redis_client::RedisClient;
use brandsync::infrastructure::services::reservoir_impl::RedisReservoir;
use std::sync::Arc;
use std::time::{Duration, Instant};
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};
use uuid::Uuid;

/// 测试用 Redis
///
/// 设置了 `BRANDSYNC_TEST_REDIS_URL` 时直接使用，否则启动容器。
/// 两者都不可用时返回 `None`，调用方跳过测试。
struct TestRedis {
    url: String,
    // Keep the container alive
    _node: Option<ContainerAsync<GenericImage>>,
}

async fn start_redis() -> Option<TestRedis> {
    if let Ok(url) = std::env::var("BRANDSYNC_TEST_REDIS_URL") {
        return Some(TestRedis { url, _node: None });
    }

    let node = match GenericImage::new("redis", "7-alpine")
        .with_exposed_port(6379.tcp())
        .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
        .start()
        .await
    {
        Ok(node) => node,
        Err(e) => {
            eprintln!("Skipping Redis reservoir test, no Redis available: {}", e);
            return None;
        }
    };
    let port = node.get_host_port_ipv4(6379).await.ok()?;

    Some(TestRedis {
        url: format!("redis://127.0.0.1:{}", port),
        _node: Some(node),
    })
}

async fn reservoir(redis: &TestRedis, prefix: &str, config: RateLimitConfig) -> RedisReservoir {
    let client = RedisClient::new(&redis.url).await.unwrap();
    RedisReservoir::new(Arc::new(client), prefix, config)
}

#[tokio::test]
async fn test_instances_share_one_window() {
    let Some(redis) = start_redis().await else {
        return;
    };
    let prefix = format!("test-{}", Uuid::new_v4());
    let config = RateLimitConfig {
        reservoir: 3,
        refresh_interval: Duration::from_millis(800),
    };
    let first = reservoir(&redis, &prefix, config).await;
    let second = reservoir(&redis, &prefix, config).await;

    let start = Instant::now();
    first.acquire().await.unwrap();
    second.acquire().await.unwrap();
    first.acquire().await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(400));

    // The quota is global: the fourth call waits for the window to expire
    tokio::time::timeout(Duration::from_secs(5), second.acquire())
        .await
        .expect("call beyond the quota is delayed, not dropped")
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_limiter_runs_tasks_over_shared_reservoir() {
    let Some(redis) = start_redis().await else {
        return;
    };
    let prefix = format!("test-{}", Uuid::new_v4());
    let limiter = RateLimiter::new(Arc::new(
        reservoir(&redis, &prefix, RateLimitConfig::default()).await,
    ));

    let value = limiter.schedule(async { 42 }).await.unwrap();
    assert_eq!(value, 42);

    // Separate prefixes are separate quotas
    let other = reservoir(
        &redis,
        &format!("test-{}", Uuid::new_v4()),
        RateLimitConfig {
            reservoir: 1,
            refresh_interval: Duration::from_secs(60),
        },
    )
    .await;
    other.acquire().await.unwrap();
}
