// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::graphql;
use crate::config::settings::MondaySettings;
use crate::domain::services::monday_api::{MondayApi, MondayApiError, MondayUser};
use crate::domain::services::rate_limiting_service::RateLimiter;
use crate::utils::retry_policy::{retry_with_policy, RetryPolicy};

/// Monday.com GraphQL 客户端
///
/// 每次尝试都先从限流器取令牌，重试同样消耗配额。
#[derive(Clone)]
pub struct MondayClient {
    http: reqwest::Client,
    api_url: String,
    api_version: String,
    limiter: RateLimiter,
    retry_policy: RetryPolicy,
}

impl MondayClient {
    pub fn new(
        settings: &MondaySettings,
        limiter: RateLimiter,
        retry_policy: RetryPolicy,
    ) -> Result<Self, MondayApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!("brandsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MondayApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            api_url: settings.api_url.clone(),
            api_version: settings.api_version.clone(),
            limiter,
            retry_policy,
        })
    }

    /// 发送一次 GraphQL 请求（限流 + 重试），返回 `data`
    async fn request(
        &self,
        operation: &'static str,
        token: &str,
        query: &'static str,
        variables: Value,
    ) -> Result<Value, MondayApiError> {
        let body = json!({ "query": query, "variables": variables });
        let body = &body;

        let result = retry_with_policy(&self.retry_policy, operation, move || async move {
            self.limiter
                .schedule(self.send(operation, token, body))
                .await?
        })
        .await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        counter!("monday_requests_total", "operation" => operation, "result" => outcome)
            .increment(1);
        if let Err(e) = &result {
            error!("Monday.com {} failed: {}", operation, e);
        }
        result
    }

    async fn send(
        &self,
        operation: &'static str,
        token: &str,
        body: &Value,
    ) -> Result<Value, MondayApiError> {
        let start = Instant::now();
        debug!("Sending Monday.com {} request", operation);

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", token)
            .header("API-Version", &self.api_version)
            .json(body)
            .send()
            .await
            .map_err(|e| MondayApiError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| MondayApiError::Network(e.to_string()))?;

        histogram!("monday_request_duration_seconds", "operation" => operation)
            .record(start.elapsed().as_secs_f64());

        if !status.is_success() {
            return Err(MondayApiError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        graphql::parse_response(&text)
    }
}

#[async_trait]
impl MondayApi for MondayClient {
    async fn create_item(
        &self,
        token: &str,
        board_id: &str,
        item_name: &str,
        column_values: &Value,
    ) -> Result<String, MondayApiError> {
        let variables = json!({
            "boardId": board_id,
            "itemName": item_name,
            "columnValues": column_values.to_string(),
        });
        let data = self
            .request("create_item", token, graphql::CREATE_ITEM, variables)
            .await?;
        graphql::extract_id(&data, "create_item")
    }

    async fn change_multiple_column_values(
        &self,
        token: &str,
        board_id: &str,
        item_id: &str,
        column_values: &Value,
    ) -> Result<String, MondayApiError> {
        let variables = json!({
            "boardId": board_id,
            "itemId": item_id,
            "columnValues": column_values.to_string(),
        });
        let data = self
            .request(
                "change_multiple_column_values",
                token,
                graphql::CHANGE_MULTIPLE_COLUMN_VALUES,
                variables,
            )
            .await?;
        graphql::extract_id(&data, "change_multiple_column_values")
    }

    async fn me(&self, token: &str) -> Result<MondayUser, MondayApiError> {
        let data = self.request("me", token, graphql::ME, json!({})).await?;
        let me = data
            .get("me")
            .cloned()
            .ok_or_else(|| MondayApiError::Decode("missing me".to_string()))?;
        serde_json::from_value(me).map_err(|e| MondayApiError::Decode(e.to_string()))
    }

    async fn create_board(
        &self,
        token: &str,
        board_name: &str,
        board_kind: &str,
    ) -> Result<String, MondayApiError> {
        let variables = json!({ "boardName": board_name, "boardKind": board_kind });
        let data = self
            .request("create_board", token, graphql::CREATE_BOARD, variables)
            .await?;
        graphql::extract_id(&data, "create_board")
    }

    async fn create_column(
        &self,
        token: &str,
        board_id: &str,
        title: &str,
        column_type: &str,
    ) -> Result<String, MondayApiError> {
        let variables = json!({
            "boardId": board_id,
            "title": title,
            "columnType": column_type,
        });
        let data = self
            .request("create_column", token, graphql::CREATE_COLUMN, variables)
            .await?;
        graphql::extract_id(&data, "create_column")
    }
}
