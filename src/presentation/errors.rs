// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::domain::repositories::local_record_repository::RepositoryError;
use crate::domain::services::pricing_service::PricingError;
use crate::domain::services::sync_service::SyncError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(e) = self.0.downcast_ref::<RepositoryError>() {
            return match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Database(_) | RepositoryError::InvalidData(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
        }
        if let Some(e) = self.0.downcast_ref::<SyncError>() {
            return match e {
                SyncError::NotConnected(_) | SyncError::BoardNotConfigured(_) => {
                    StatusCode::CONFLICT
                }
                SyncError::RecordNotFound(_) => StatusCode::NOT_FOUND,
                SyncError::BrandMismatch(..) => StatusCode::FORBIDDEN,
                SyncError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                SyncError::Mapping(_) | SyncError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                SyncError::Api(_) => StatusCode::BAD_GATEWAY,
            };
        }
        if self.0.downcast_ref::<PricingError>().is_some()
            || self.0.downcast_ref::<validator::ValidationErrors>().is_some()
        {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
            "Internal Server Error".to_string()
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::local_record::EntityType;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(SyncError::NotConnected("b".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(SyncError::BoardNotConfigured(EntityType::Lead)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(PricingError::InvalidMiles(-1.0)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
