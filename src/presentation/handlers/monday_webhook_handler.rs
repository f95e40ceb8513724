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

use crate::domain::services::webhook_reconciler::{WebhookOutcome, WebhookReconciler};
use axum::{
    body::Bytes,
    extract::{Extension, Query},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    #[serde(rename = "brandId")]
    pub brand_id: Option<String>,
}

/// Monday.com webhook 入口
///
/// 签名针对原始请求体计算，因此以字节接收，不经过 JSON 提取器。
pub async fn receive_monday_webhook(
    Extension(reconciler): Extension<WebhookReconciler>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match reconciler
        .handle(&body, query.brand_id.as_deref(), authorization)
        .await
    {
        WebhookOutcome::Challenge(challenge) => {
            (StatusCode::OK, Json(json!({ "challenge": challenge }))).into_response()
        }
        WebhookOutcome::Processed(_) => {
            (StatusCode::OK, "Webhook processed successfully.").into_response()
        }
        WebhookOutcome::InvalidSignature => {
            (StatusCode::UNAUTHORIZED, "Invalid signature").into_response()
        }
        WebhookOutcome::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        WebhookOutcome::Failed => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
