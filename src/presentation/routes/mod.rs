// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::repositories::brand_integration_repository::BrandIntegrationRepository;
use crate::domain::repositories::local_record_repository::LocalRecordRepository;
use crate::domain::repositories::sync_intent_repository::SyncIntentRepository;
use crate::domain::services::board_provisioning::BoardProvisioner;
use crate::domain::services::monday_api::MondayApi;
use crate::domain::services::pricing_service::PricingService;
use crate::domain::services::rate_limiting_service::RateLimiter;
use crate::domain::services::signature_service::SignatureVerifier;
use crate::domain::services::sync_log_service::SyncLogService;
use crate::domain::services::sync_outbox_service::SyncOutboxService;
use crate::domain::services::sync_service::SyncService;
use crate::domain::services::webhook_reconciler::WebhookReconciler;
use crate::infrastructure::monday::client::MondayClient;
use crate::infrastructure::repositories::brand_integration_repo_impl::BrandIntegrationRepoImpl;
use crate::infrastructure::repositories::local_record_repo_impl::LocalRecordRepoImpl;
use crate::infrastructure::repositories::sync_intent_repo_impl::SyncIntentRepoImpl;
use crate::infrastructure::repositories::sync_log_repo_impl::SyncLogRepoImpl;
use crate::presentation::handlers::{
    integration_handler, monday_webhook_handler, pricing_handler, sync_handler,
};
use crate::presentation::middleware::auth_middleware::{auth_middleware, AuthState};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 路由依赖的共享组件
#[derive(Clone)]
pub struct AppContext {
    pub db: Arc<DatabaseConnection>,
    pub settings: Arc<Settings>,
    pub integrations: Arc<dyn BrandIntegrationRepository>,
    pub records: Arc<dyn LocalRecordRepository>,
    pub intents: Arc<dyn SyncIntentRepository>,
    pub monday: Arc<dyn MondayApi>,
    pub sync_service: SyncService,
    pub outbox: SyncOutboxService,
    pub sync_log: SyncLogService,
    pub reconciler: WebhookReconciler,
    pub provisioner: BoardProvisioner,
    pub pricing: PricingService,
}

impl AppContext {
    /// 组装仓库、Monday.com 客户端和领域服务
    pub fn build(
        settings: Arc<Settings>,
        db: Arc<DatabaseConnection>,
        limiter: RateLimiter,
    ) -> anyhow::Result<Self> {
        let integrations: Arc<dyn BrandIntegrationRepository> =
            Arc::new(BrandIntegrationRepoImpl::new(db.clone()));
        let records: Arc<dyn LocalRecordRepository> =
            Arc::new(LocalRecordRepoImpl::new(db.clone()));
        let intents: Arc<dyn SyncIntentRepository> =
            Arc::new(SyncIntentRepoImpl::new(db.clone()));
        let sync_log = SyncLogService::new(Arc::new(SyncLogRepoImpl::new(db.clone())));

        let monday: Arc<dyn MondayApi> = Arc::new(MondayClient::new(
            &settings.monday,
            limiter,
            settings.retry.to_policy(),
        )?);

        let sync_service = SyncService::new(
            records.clone(),
            integrations.clone(),
            monday.clone(),
            sync_log.clone(),
        );
        let outbox = SyncOutboxService::new(
            intents.clone(),
            records.clone(),
            integrations.clone(),
            settings.outbox.max_attempts,
        );
        let reconciler = WebhookReconciler::new(
            records.clone(),
            integrations.clone(),
            sync_log.clone(),
            SignatureVerifier::new(settings.webhook.signing_secret.clone()),
            settings.webhook.tie_break,
        );
        let provisioner = BoardProvisioner::new(integrations.clone(), monday.clone());
        let pricing = PricingService::new(settings.pricing.mileage_rate)?;

        Ok(Self {
            db,
            settings,
            integrations,
            records,
            intents,
            monday,
            sync_service,
            outbox,
            sync_log,
            reconciler,
            provisioner,
            pricing,
        })
    }
}

/// 创建应用路由
///
/// `/health`、`/v1/version` 和 `/webhooks/monday` 公开，
/// 其余 `/v1` 路由需要运维 API 密钥。
pub fn routes(ctx: AppContext) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route(
            "/webhooks/monday",
            post(monday_webhook_handler::receive_monday_webhook),
        );

    let protected_routes = Router::new()
        .route(
            "/v1/brands/{brand_id}/integration/monday",
            get(integration_handler::get_integration)
                .put(integration_handler::update_integration)
                .delete(integration_handler::disconnect_integration),
        )
        .route(
            "/v1/brands/{brand_id}/integration/monday/provision",
            post(integration_handler::provision_boards),
        )
        .route(
            "/v1/integrations/monday/test",
            post(integration_handler::test_connection),
        )
        .route(
            "/v1/brands/{brand_id}/sync-history",
            get(integration_handler::sync_history),
        )
        .route(
            "/v1/brands/{brand_id}/sync/{entity_type}/{entity_id}",
            post(sync_handler::sync_now),
        )
        .route(
            "/v1/brands/{brand_id}/sync/{entity_type}/{entity_id}/enqueue",
            post(sync_handler::enqueue_sync),
        )
        .route(
            "/v1/brands/{brand_id}/full-sync",
            post(sync_handler::full_sync),
        )
        .route(
            "/v1/pricing/agency-shift",
            post(pricing_handler::agency_shift_cost),
        )
        .layer(axum::middleware::from_fn_with_state(
            AuthState { db: ctx.db.clone() },
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(Extension(ctx.settings))
        .layer(Extension(ctx.integrations))
        .layer(Extension(ctx.monday))
        .layer(Extension(ctx.sync_service))
        .layer(Extension(ctx.outbox))
        .layer(Extension(ctx.sync_log))
        .layer(Extension(ctx.reconciler))
        .layer(Extension(ctx.provisioner))
        .layer(Extension(ctx.pricing))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
