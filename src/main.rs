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

use brandsync::config::settings::{ReservoirBackend, Settings};
use brandsync::domain::services::column_mapping::validate_mapping_table;
use brandsync::domain::services::rate_limiting_service::{RateLimiter, Reservoir};
use brandsync::infrastructure::cache::redis_client::RedisClient;
use brandsync::infrastructure::database::connection;
use brandsync::infrastructure::metrics;
use brandsync::infrastructure::services::reservoir_impl::{InMemoryReservoir, RedisReservoir};
use brandsync::presentation::routes::{self, AppContext};
use brandsync::utils::telemetry;
use brandsync::workers::sync_log_trim_worker::SyncLogTrimWorker;
use brandsync::workers::sync_outbox_worker::SyncOutboxWorker;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = Arc::new(Settings::new()?);

    // 2. Initialize logging
    telemetry::init_telemetry(settings.telemetry.json);
    info!("Starting brandsync {}...", env!("CARGO_PKG_VERSION"));

    if settings.telemetry.metrics_enabled {
        metrics::init_metrics(&settings.telemetry.metrics_addr)?;
        info!(
            "Prometheus exporter listening on {}",
            settings.telemetry.metrics_addr
        );
    }

    // 3. Connect to database and apply migrations
    let db = Arc::new(connection::connect_and_migrate(&settings.database).await?);
    info!("Database connection established");

    // A broken column mapping must stop startup, not the first sync
    validate_mapping_table()?;

    // 4. Outbound rate limiter
    let limit = settings.rate_limiting.to_config();
    let reservoir: Arc<dyn Reservoir> = match settings.rate_limiting.backend {
        ReservoirBackend::Memory => Arc::new(InMemoryReservoir::new(limit)),
        ReservoirBackend::Redis => {
            let redis = Arc::new(RedisClient::new(&settings.redis.url).await?);
            info!("Redis client initialized");
            Arc::new(RedisReservoir::new(
                redis,
                &settings.redis.key_prefix,
                limit,
            ))
        }
    };
    let limiter = RateLimiter::new(reservoir);

    // 5. Repositories and services
    let ctx = AppContext::build(settings.clone(), db, limiter)?;

    // 6. Background workers
    let outbox_worker = SyncOutboxWorker::new(
        ctx.intents.clone(),
        ctx.sync_service.clone(),
        &settings.outbox,
    );
    outbox_worker.start();

    let trim_worker = SyncLogTrimWorker::new(
        ctx.integrations.clone(),
        ctx.sync_log.clone(),
        settings.sync_log.retention,
        Duration::from_secs(settings.sync_log.trim_interval_secs),
    );
    trim_worker.start();
    info!("Background workers started");

    // 7. Start HTTP server
    let app = routes::routes(ctx);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
