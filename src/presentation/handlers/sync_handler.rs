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

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    domain::models::local_record::{EntityType, RecordRef},
    domain::models::sync_intent::SyncIntent,
    domain::services::sync_outbox_service::SyncOutboxService,
    domain::services::sync_service::{SyncOutcome, SyncService},
    presentation::errors::AppError,
};

fn parse_entity_type(raw: &str) -> Result<EntityType, Response> {
    raw.parse::<EntityType>().map_err(|e| {
        (StatusCode::BAD_REQUEST, axum::Json(json!({ "error": e }))).into_response()
    })
}

/// 立即同步一条记录
///
/// 同步失败时仍返回 200，结果体中 `success` 为 false
pub async fn sync_now(
    Extension(sync_service): Extension<SyncService>,
    Path((brand_id, entity_type, entity_id)): Path<(String, String, Uuid)>,
) -> Result<Json<SyncOutcome>, Response> {
    let entity_type = parse_entity_type(&entity_type)?;
    let outcome = sync_service
        .sync_record(&brand_id, RecordRef::new(entity_type, entity_id))
        .await;
    Ok(Json(outcome))
}

/// 写入发件箱，由后台工作器投递
pub async fn enqueue_sync(
    Extension(outbox): Extension<SyncOutboxService>,
    Path((brand_id, entity_type, entity_id)): Path<(String, String, Uuid)>,
) -> Result<(StatusCode, Json<SyncIntent>), Response> {
    let entity_type = parse_entity_type(&entity_type)?;
    let intent = outbox
        .enqueue(&brand_id, entity_type, entity_id)
        .await
        .map_err(|e| AppError::from(e).into_response())?;
    Ok((StatusCode::ACCEPTED, Json(intent)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSyncResponse {
    pub queued: usize,
    pub intents: Vec<SyncIntent>,
}

/// 把品牌所有尚未同步的记录写入发件箱
pub async fn full_sync(
    Extension(outbox): Extension<SyncOutboxService>,
    Path(brand_id): Path<String>,
) -> Result<(StatusCode, Json<FullSyncResponse>), AppError> {
    let intents = outbox.enqueue_full_sync(&brand_id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(FullSyncResponse {
            queued: intents.len(),
            intents,
        }),
    ))
}
