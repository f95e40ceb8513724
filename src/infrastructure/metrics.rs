// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 初始化指标系统
///
/// 在 `addr` 上启动 Prometheus 导出器并注册同步相关指标。
/// 地址被占用时只记录警告，不影响服务启动。
pub fn init_metrics(addr: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = addr.parse()?;

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return Ok(());
    }

    describe_counter!(
        "monday_requests_total",
        "Total number of Monday.com API requests by operation and result"
    );
    describe_histogram!(
        "monday_request_duration_seconds",
        "Duration of Monday.com API requests in seconds"
    );
    describe_counter!(
        "monday_sync_total",
        "Total number of outbound sync attempts by action and result"
    );
    describe_counter!(
        "monday_webhook_events_total",
        "Total number of inbound webhook requests by outcome"
    );
    describe_counter!(
        "sync_outbox_delivered_total",
        "Total number of sync intents delivered"
    );
    describe_counter!(
        "sync_outbox_dead_total",
        "Total number of sync intents that exhausted their attempts"
    );
    describe_counter!(
        "sync_log_trimmed_total",
        "Total number of audit log entries removed by trimming"
    );
    describe_counter!(
        "sync_log_trim_failures_total",
        "Total number of brands whose audit log could not be trimmed"
    );

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
