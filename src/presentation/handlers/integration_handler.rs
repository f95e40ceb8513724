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
};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    application::dto::{
        integration_request::{TestConnectionRequestDto, UpdateIntegrationRequestDto},
        integration_response::{IntegrationStatusDto, TestConnectionResponseDto},
    },
    config::settings::Settings,
    domain::models::brand_integration::BrandIntegrationSettings,
    domain::models::sync_log::SyncLogEntry,
    domain::repositories::brand_integration_repository::BrandIntegrationRepository,
    domain::services::board_provisioning::{BoardProvisioner, ProvisionReport},
    domain::services::monday_api::MondayApi,
    domain::services::sync_log_service::SyncLogService,
    presentation::errors::AppError,
};

/// 查询品牌的 Monday.com 集成状态
pub async fn get_integration(
    Extension(repo): Extension<Arc<dyn BrandIntegrationRepository>>,
    Path(brand_id): Path<String>,
) -> Result<Json<IntegrationStatusDto>, AppError> {
    let status = match repo.find(&brand_id).await? {
        Some(settings) => settings.into(),
        None => IntegrationStatusDto::disconnected(),
    };
    Ok(Json(status))
}

/// 保存品牌的令牌和看板ID
pub async fn update_integration(
    Extension(repo): Extension<Arc<dyn BrandIntegrationRepository>>,
    Path(brand_id): Path<String>,
    Json(request): Json<UpdateIntegrationRequestDto>,
) -> Result<Json<IntegrationStatusDto>, AppError> {
    request.validate()?;

    let mut settings = repo
        .find(&brand_id)
        .await?
        .unwrap_or_else(|| BrandIntegrationSettings::new(brand_id.clone()));

    if let Some(token) = request.api_token {
        settings.api_token = Some(token);
    }
    if let Some(board_ids) = request.board_ids {
        settings.board_ids = board_ids;
    }

    let saved = repo.upsert(&settings).await?;
    info!("Saved Monday.com settings for brand {}", brand_id);
    Ok(Json(saved.into()))
}

/// 断开连接：清除令牌，保留看板ID和同步记录
pub async fn disconnect_integration(
    Extension(repo): Extension<Arc<dyn BrandIntegrationRepository>>,
    Path(brand_id): Path<String>,
) -> Result<Json<IntegrationStatusDto>, AppError> {
    let Some(mut settings) = repo.find(&brand_id).await? else {
        return Ok(Json(IntegrationStatusDto::disconnected()));
    };

    settings.api_token = None;
    let saved = repo.upsert(&settings).await?;
    info!("Disconnected Monday.com for brand {}", brand_id);
    Ok(Json(saved.into()))
}

/// 用令牌查询 `me`，验证连通性
pub async fn test_connection(
    Extension(monday): Extension<Arc<dyn MondayApi>>,
    Json(request): Json<TestConnectionRequestDto>,
) -> Result<Json<TestConnectionResponseDto>, AppError> {
    request.validate()?;

    let response = match monday.me(&request.api_token).await {
        Ok(user) => TestConnectionResponseDto {
            success: true,
            user: Some(user),
            error: None,
        },
        Err(e) => {
            warn!("Monday.com connection test failed: {}", e);
            TestConnectionResponseDto {
                success: false,
                user: None,
                error: Some(e.to_string()),
            }
        }
    };
    Ok(Json(response))
}

/// 为品牌创建默认看板
pub async fn provision_boards(
    Extension(provisioner): Extension<BoardProvisioner>,
    Path(brand_id): Path<String>,
) -> Result<(StatusCode, Json<ProvisionReport>), AppError> {
    let report = provisioner.provision(&brand_id).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// 品牌最近的同步日志
pub async fn sync_history(
    Extension(sync_log): Extension<SyncLogService>,
    Extension(settings): Extension<Arc<Settings>>,
    Path(brand_id): Path<String>,
) -> Result<Json<Vec<SyncLogEntry>>, AppError> {
    let entries = sync_log
        .history(&brand_id, settings.sync_log.history_limit)
        .await?;
    Ok(Json(entries))
}
