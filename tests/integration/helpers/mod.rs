// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::Bytes;
use axum_test::{TestResponse, TestServer};
use brandsync::config::settings::Settings;
use brandsync::domain::models::brand_integration::{BoardIds, BrandIntegrationSettings};
use brandsync::domain::models::local_record::{Lead, LocalRecord, Order};
use brandsync::domain::services::rate_limiting_service::RateLimiter;
use brandsync::domain::services::signature_service::SignatureVerifier;
use brandsync::infrastructure::database::connection;
use brandsync::infrastructure::database::entities::api_key;
use brandsync::infrastructure::services::reservoir_impl::InMemoryReservoir;
use brandsync::presentation::routes::{self, AppContext};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-operator-key";
pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BRAND_TOKEN: &str = "brand-monday-token";

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub ctx: AppContext,
    pub monday: MockServer,
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(&[]).await
}

/// 内存库 + 模拟 Monday.com 的完整应用
///
/// `overrides` 覆盖默认配置，例如 `("webhook.tie_break", "reject")`
pub async fn create_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let monday = MockServer::start().await;

    let mut builder = Settings::builder("test")
        .unwrap()
        .set_override("database.url", "sqlite::memory:")
        .unwrap()
        .set_override("monday.api_url", format!("{}/v2", monday.uri()))
        .unwrap()
        .set_override("webhook.signing_secret", SIGNING_SECRET)
        .unwrap()
        .set_override("retry.min_timeout_ms", 1)
        .unwrap()
        .set_override("retry.max_timeout_ms", 5)
        .unwrap()
        .set_override("telemetry.metrics_enabled", false)
        .unwrap();
    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }
    let settings: Settings = builder.build().unwrap().try_deserialize().unwrap();
    settings.validate().unwrap();
    let settings = Arc::new(settings);

    let db = Arc::new(
        connection::connect_and_migrate(&settings.database)
            .await
            .expect("Failed to migrate in-memory database"),
    );

    api_key::ActiveModel {
        id: Set(Uuid::new_v4()),
        key: Set(API_KEY.to_string()),
        label: Set(Some("integration tests".to_string())),
        created_at: Set(Utc::now().into()),
    }
    .insert(db.as_ref())
    .await
    .expect("Failed to insert API key");

    let limiter = RateLimiter::new(Arc::new(InMemoryReservoir::new(
        settings.rate_limiting.to_config(),
    )));
    let ctx = AppContext::build(settings, db, limiter).expect("Failed to build app context");
    let server = TestServer::new(routes::routes(ctx.clone())).unwrap();

    TestApp {
        server,
        ctx,
        monday,
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", API_KEY)
}

/// 保存一个已连接品牌，五个看板全部配置
pub async fn connect_brand(app: &TestApp, brand_id: &str) -> BrandIntegrationSettings {
    let mut settings = BrandIntegrationSettings::new(brand_id);
    settings.api_token = Some(BRAND_TOKEN.to_string());
    settings.board_ids = BoardIds {
        leads: Some("1001".to_string()),
        orders: Some("1002".to_string()),
        invoices: Some("1003".to_string()),
        activations: Some("1004".to_string()),
        accounts: Some("1005".to_string()),
    };
    app.ctx.integrations.upsert(&settings).await.unwrap()
}

pub async fn insert_lead(app: &TestApp, brand_id: &str, item_id: Option<&str>) -> Uuid {
    let lead = Lead {
        id: Uuid::new_v4(),
        owner_brand_id: brand_id.to_string(),
        dispensary_name: "Green Leaf Dispensary".to_string(),
        contact_person: Some("Jordan Smith".to_string()),
        email: Some("jordan@greenleaf.test".to_string()),
        status: Some("New".to_string()),
        monday_item_id: item_id.map(str::to_string),
        created_at: Utc::now(),
        ..Default::default()
    };
    app.ctx
        .records
        .insert(&LocalRecord::Lead(lead))
        .await
        .unwrap()
        .id()
}

pub async fn insert_order(app: &TestApp, brand_id: &str, item_id: Option<&str>) -> Uuid {
    let order = Order {
        id: Uuid::new_v4(),
        brand_id: brand_id.to_string(),
        dispensary_name: Some("Green Leaf Dispensary".to_string()),
        amount_cents: 45_000,
        status: Some("Pending".to_string()),
        monday_item_id: item_id.map(str::to_string),
        created_at: Utc::now(),
        ..Default::default()
    };
    app.ctx
        .records
        .insert(&LocalRecord::Order(order))
        .await
        .unwrap()
        .id()
}

pub fn status_change(item_id: i64, label: &str) -> Value {
    json!({
        "event": {
            "type": "update_column_value",
            "columnId": "status",
            "boardId": 1001,
            "itemId": item_id,
            "value": { "label": { "text": label } }
        }
    })
}

/// 发送带正确签名的 webhook
pub async fn post_signed_webhook(app: &TestApp, brand_id: Option<&str>, body: &Value) -> TestResponse {
    let raw = body.to_string();
    let signature = SignatureVerifier::new(Some(SIGNING_SECRET.to_string()))
        .sign(raw.as_bytes())
        .unwrap();

    let mut request = app
        .server
        .post("/webhooks/monday")
        .add_header("Authorization", signature)
        .content_type("application/json")
        .bytes(Bytes::from(raw));
    if let Some(brand_id) = brand_id {
        request = request.add_query_param("brandId", brand_id);
    }
    request.await
}

/// 模拟 Monday.com 对某个 mutation 返回的条目ID
pub async fn mock_mutation(app: &TestApp, mutation: &str, item_id: &str) {
    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(body_string_contains(mutation))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { mutation: { "id": item_id } } })),
        )
        .mount(&app.monday)
        .await;
}
