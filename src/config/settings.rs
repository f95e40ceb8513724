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

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::services::rate_limiting_service::RateLimitConfig;
use crate::domain::services::webhook_reconciler::TieBreakPolicy;
use crate::utils::retry_policy::RetryPolicy;

/// 应用程序配置设置
///
/// 包含服务器、数据库、Redis、限流、重试、Monday.com、webhook、
/// 审计日志、发件箱、计费和遥测等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    pub redis: RedisSettings,
    /// 出站限流配置
    pub rate_limiting: RateLimitingSettings,
    /// 重试配置
    pub retry: RetrySettings,
    /// Monday.com API 配置
    pub monday: MondaySettings,
    /// Webhook 配置
    pub webhook: WebhookSettings,
    /// 同步日志配置
    pub sync_log: SyncLogSettings,
    /// 发件箱配置
    pub outbox: OutboxSettings,
    /// 计费配置
    pub pricing: PricingSettings,
    /// 遥测配置
    pub telemetry: TelemetrySettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// Redis配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: String,
    /// 键前缀
    pub key_prefix: String,
}

/// 令牌池后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservoirBackend {
    /// 进程内（单实例）
    Memory,
    /// Redis 共享（多实例）
    Redis,
}

/// 出站限流配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    pub backend: ReservoirBackend,
    /// 每个周期允许的调用数
    pub reservoir: u32,
    /// 补满周期（秒）
    pub refresh_interval_secs: u64,
}

impl RateLimitingSettings {
    pub fn to_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            reservoir: self.reservoir,
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
        }
    }
}

/// 重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    /// 最大重试次数
    pub max_retries: u32,
    /// 退避乘数
    pub factor: f64,
    /// 初始退避（毫秒）
    pub min_timeout_ms: u64,
    /// 最大退避（毫秒）
    pub max_timeout_ms: u64,
}

impl RetrySettings {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.min_timeout_ms),
            max_backoff: Duration::from_millis(self.max_timeout_ms),
            backoff_multiplier: self.factor,
            ..RetryPolicy::default()
        }
    }
}

/// Monday.com API 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MondaySettings {
    /// GraphQL 端点
    pub api_url: String,
    /// `API-Version` 头
    pub api_version: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

/// Webhook 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    /// Monday.com 签名密钥，未配置时拒绝所有事件
    pub signing_secret: Option<String>,
    /// 线索与订单同时匹配时的处理策略
    pub tie_break: TieBreakPolicy,
}

/// 同步日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SyncLogSettings {
    /// 每个品牌保留的日志条数
    pub retention: u64,
    /// 清理间隔（秒）
    pub trim_interval_secs: u64,
    /// 历史查询返回条数
    pub history_limit: u64,
}

/// 发件箱配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OutboxSettings {
    /// 轮询间隔（秒）
    pub poll_interval_secs: u64,
    /// 每批处理条数
    pub batch_size: u64,
    /// 并发投递数
    pub concurrency: usize,
    /// 最大尝试次数
    pub max_attempts: i32,
}

/// 计费配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PricingSettings {
    /// 每英里费率（美元）
    pub mileage_rate: f64,
}

/// 遥测配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// 是否输出 JSON 格式日志
    pub json: bool,
    /// 是否启用 Prometheus 导出
    pub metrics_enabled: bool,
    /// Prometheus 监听地址
    pub metrics_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 加载顺序：内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// `BRANDSYNC__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let settings: Settings = Self::builder(&env)?.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 带默认值和文件、环境变量来源的配置构建器
    pub fn builder(env: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB settings
            .set_default("database.url", "sqlite://brandsync.db?mode=rwc")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.key_prefix", "brandsync")?
            // Outbound reservoir: 50 calls per 60 s
            .set_default("rate_limiting.backend", "memory")?
            .set_default("rate_limiting.reservoir", 50)?
            .set_default("rate_limiting.refresh_interval_secs", 60)?
            .set_default("retry.max_retries", 3)?
            .set_default("retry.factor", 2.0)?
            .set_default("retry.min_timeout_ms", 1000)?
            .set_default("retry.max_timeout_ms", 30000)?
            .set_default("monday.api_url", "https://api.monday.com/v2")?
            .set_default("monday.api_version", "2024-01")?
            .set_default("monday.request_timeout_secs", 30)?
            .set_default("webhook.tie_break", "prefer_lead")?
            .set_default("sync_log.retention", 100)?
            .set_default("sync_log.trim_interval_secs", 86400)?
            .set_default("sync_log.history_limit", 20)?
            .set_default("outbox.poll_interval_secs", 5)?
            .set_default("outbox.batch_size", 50)?
            .set_default("outbox.concurrency", 10)?
            .set_default("outbox.max_attempts", 5)?
            .set_default("pricing.mileage_rate", 0.70)?
            .set_default("telemetry.json", false)?
            .set_default("telemetry.metrics_enabled", true)?
            .set_default("telemetry.metrics_addr", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BRANDSYNC")
                    .prefix_separator("__")
                    .separator("__"),
            );

        Ok(builder)
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limiting.reservoir == 0 {
            return Err(ConfigError::Message(
                "rate_limiting.reservoir must be greater than 0".to_string(),
            ));
        }
        if self.rate_limiting.refresh_interval_secs == 0 {
            return Err(ConfigError::Message(
                "rate_limiting.refresh_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.retry.max_retries > 10 {
            return Err(ConfigError::Message(
                "retry.max_retries must be at most 10".to_string(),
            ));
        }
        if !self.retry.factor.is_finite() || self.retry.factor < 1.0 {
            return Err(ConfigError::Message(
                "retry.factor must be at least 1.0".to_string(),
            ));
        }
        if !self.pricing.mileage_rate.is_finite() || self.pricing.mileage_rate < 0.0 {
            return Err(ConfigError::Message(
                "pricing.mileage_rate must be a non-negative number".to_string(),
            ));
        }
        if self.outbox.max_attempts < 1 || self.outbox.concurrency == 0 || self.outbox.batch_size == 0 {
            return Err(ConfigError::Message(
                "outbox.max_attempts, outbox.concurrency and outbox.batch_size must be positive"
                    .to_string(),
            ));
        }
        if url::Url::parse(&self.monday.api_url).is_err() {
            return Err(ConfigError::Message(format!(
                "monday.api_url is not a valid URL: {}",
                self.monday.api_url
            )));
        }
        if self.sync_log.history_limit == 0 {
            return Err(ConfigError::Message(
                "sync_log.history_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
