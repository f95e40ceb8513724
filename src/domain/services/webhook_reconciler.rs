// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::domain::models::local_record::RecordRef;
use crate::domain::models::monday_event::{MondayEvent, WebhookPayload};
use crate::domain::models::sync_log::SyncLogEntry;
use crate::domain::repositories::brand_integration_repository::BrandIntegrationRepository;
use crate::domain::repositories::local_record_repository::{
    LocalRecordRepository, RepositoryError,
};
use crate::domain::services::signature_service::SignatureVerifier;
use crate::domain::services::sync_log_service::SyncLogService;

/// 线索和订单同时匹配同一条目时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakPolicy {
    /// 优先更新线索
    #[default]
    PreferLead,
    /// 优先更新订单
    PreferOrder,
    /// 不更新任何记录
    Reject,
}

/// 条目ID到本地记录的解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "records", rename_all = "snake_case")]
pub enum Resolution {
    Matched(RecordRef),
    AmbiguousMatch(Vec<RecordRef>),
    NoMatch,
}

fn pick(candidates: Vec<RecordRef>) -> Resolution {
    match candidates.len() {
        0 => Resolution::NoMatch,
        1 => Resolution::Matched(candidates[0]),
        _ => Resolution::AmbiguousMatch(candidates),
    }
}

/// 在品牌范围内的线索和订单匹配结果中选出要更新的记录
///
/// 同一张表内出现多条匹配时视为歧义，不做任何更新。
pub fn resolve(leads: Vec<RecordRef>, orders: Vec<RecordRef>, policy: TieBreakPolicy) -> Resolution {
    match policy {
        TieBreakPolicy::PreferLead if !leads.is_empty() => pick(leads),
        TieBreakPolicy::PreferLead => pick(orders),
        TieBreakPolicy::PreferOrder if !orders.is_empty() => pick(orders),
        TieBreakPolicy::PreferOrder => pick(leads),
        TieBreakPolicy::Reject => pick(leads.into_iter().chain(orders).collect()),
    }
}

/// 一次 webhook 请求的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    /// 握手请求，原样返回 challenge
    Challenge(Value),
    /// 事件已处理；非状态变更事件没有解析结果
    Processed(Option<Resolution>),
    /// 签名无效
    InvalidSignature,
    /// 请求不完整，未产生任何副作用
    BadRequest(&'static str),
    /// 内部错误
    Failed,
}

/// Monday.com webhook 对账器
///
/// 处理顺序：握手、签名校验、参数校验、品牌范围内查找、更新、写审计日志。
#[derive(Clone)]
pub struct WebhookReconciler {
    records: Arc<dyn LocalRecordRepository>,
    integrations: Arc<dyn BrandIntegrationRepository>,
    sync_log: SyncLogService,
    verifier: SignatureVerifier,
    tie_break: TieBreakPolicy,
}

impl WebhookReconciler {
    pub fn new(
        records: Arc<dyn LocalRecordRepository>,
        integrations: Arc<dyn BrandIntegrationRepository>,
        sync_log: SyncLogService,
        verifier: SignatureVerifier,
        tie_break: TieBreakPolicy,
    ) -> Self {
        Self {
            records,
            integrations,
            sync_log,
            verifier,
            tie_break,
        }
    }

    /// 处理一次 webhook 请求
    ///
    /// # 参数
    ///
    /// * `body` - 原始请求体，签名针对这些字节计算
    /// * `brand_id` - 查询参数中的品牌ID
    /// * `authorization` - `Authorization` 头
    pub async fn handle(
        &self,
        body: &[u8],
        brand_id: Option<&str>,
        authorization: Option<&str>,
    ) -> WebhookOutcome {
        let outcome = self.process(body, brand_id, authorization).await;
        let label = match &outcome {
            WebhookOutcome::Challenge(_) => "challenge",
            WebhookOutcome::Processed(_) => "processed",
            WebhookOutcome::InvalidSignature => "invalid_signature",
            WebhookOutcome::BadRequest(_) => "bad_request",
            WebhookOutcome::Failed => "failed",
        };
        counter!("monday_webhook_events_total", "outcome" => label).increment(1);
        outcome
    }

    async fn process(
        &self,
        body: &[u8],
        brand_id: Option<&str>,
        authorization: Option<&str>,
    ) -> WebhookOutcome {
        let raw: Value = match serde_json::from_slice(body) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Webhook body is not valid JSON: {}", e);
                return WebhookOutcome::BadRequest("Invalid JSON payload");
            }
        };

        let brand_id = brand_id.map(str::trim).filter(|b| !b.is_empty());

        if let Some(challenge) = raw.get("challenge").filter(|c| is_present(c)) {
            info!("Responding to Monday.com challenge");
            if let Some(brand_id) = brand_id {
                self.stamp_verified(brand_id).await;
            }
            return WebhookOutcome::Challenge(challenge.clone());
        }

        if !self.verifier.verify(body, authorization) {
            warn!("Invalid Monday.com webhook signature");
            return WebhookOutcome::InvalidSignature;
        }

        let payload: WebhookPayload = match serde_json::from_value(raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Webhook event has an unexpected shape: {}", e);
                return WebhookOutcome::BadRequest("Invalid event payload");
            }
        };

        let Some(event) = payload.event else {
            warn!("Webhook received without an event payload");
            return WebhookOutcome::BadRequest("Missing event payload");
        };
        let Some(brand_id) = brand_id else {
            warn!("Webhook received without a brandId in the query string");
            return WebhookOutcome::BadRequest("Missing brandId");
        };

        if event.is_status_change() {
            if event.item_id_string().is_none() {
                warn!("Status change for brand {} without itemId", brand_id);
                return WebhookOutcome::BadRequest("Missing itemId");
            }
            if event.status_label().is_none() {
                warn!("Status change for brand {} without a label", brand_id);
                return WebhookOutcome::BadRequest("Missing status label");
            }
        }

        let result = if event.is_status_change() {
            self.apply_status_change(brand_id, &event).await.map(Some)
        } else {
            debug!(
                "Ignoring Monday.com event '{}' on column {:?}",
                event.event_type, event.column_id
            );
            Ok(None)
        };

        match result {
            Ok(resolution) => {
                self.sync_log
                    .record(SyncLogEntry::inbound(
                        brand_id,
                        true,
                        log_details(brand_id, &event, resolution.as_ref()),
                        None,
                    ))
                    .await;
                WebhookOutcome::Processed(resolution)
            }
            Err(e) => {
                error!("Error processing Monday.com webhook: {}", e);
                self.sync_log
                    .record(SyncLogEntry::inbound(
                        brand_id,
                        false,
                        log_details(brand_id, &event, None),
                        Some(e.to_string()),
                    ))
                    .await;
                WebhookOutcome::Failed
            }
        }
    }

    async fn apply_status_change(
        &self,
        brand_id: &str,
        event: &MondayEvent,
    ) -> Result<Resolution, RepositoryError> {
        // Both presence checks ran before this call.
        let item_id = event.item_id_string().unwrap_or_default();
        let status = event.status_label().unwrap_or_default();

        let (leads, orders) = tokio::try_join!(
            self.records.find_leads_by_item(brand_id, &item_id),
            self.records.find_orders_by_item(brand_id, &item_id),
        )?;

        let resolution = resolve(leads, orders, self.tie_break);
        match &resolution {
            Resolution::Matched(record) => {
                self.records
                    .update_status(*record, status, Utc::now())
                    .await?;
                info!(
                    "Updated {} {} for brand {} to status \"{}\"",
                    record.entity_type, record.id, brand_id, status
                );
            }
            Resolution::AmbiguousMatch(candidates) => {
                warn!(
                    "Item {} for brand {} matches {} records, nothing updated",
                    item_id,
                    brand_id,
                    candidates.len()
                );
            }
            Resolution::NoMatch => {
                warn!(
                    "Received status update for unknown item ID: {} for brand: {}",
                    item_id, brand_id
                );
            }
        }
        Ok(resolution)
    }

    /// 握手成功后记录 `webhook_verified_at`
    ///
    /// 握手请求不带签名，时间戳仅作参考：只对已有集成设置的品牌写入，
    /// 未知品牌不建行。
    async fn stamp_verified(&self, brand_id: &str) {
        match self.integrations.find(brand_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                debug!("Challenge for brand {} without integration settings", brand_id);
                return;
            }
            Err(e) => {
                warn!("Failed to load integration settings for {}: {}", brand_id, e);
                return;
            }
        }

        match self
            .integrations
            .mark_webhook_verified(brand_id, Utc::now())
            .await
        {
            Ok(()) => info!("Webhook challenge recorded for brand {}", brand_id),
            Err(RepositoryError::NotFound) => {
                debug!("Challenge for brand {} without integration settings", brand_id)
            }
            Err(e) => warn!("Failed to stamp webhook verification for {}: {}", brand_id, e),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// 审计日志内容：事件原文、品牌ID和解析结果
fn log_details(brand_id: &str, event: &MondayEvent, resolution: Option<&Resolution>) -> Value {
    let mut details = match serde_json::to_value(event) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    details.insert("brandId".to_string(), json!(brand_id));
    if let Some(resolution) = resolution {
        details.insert("resolution".to_string(), json!(resolution));
    }
    Value::Object(details)
}
