// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{bearer, connect_brand, create_test_app, insert_lead, mock_mutation};
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

const INTEGRATION: &str = "/v1/brands/brand-a/integration/monday";

#[tokio::test]
async fn test_unknown_brand_reports_disconnected() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(INTEGRATION)
        .add_header("Authorization", bearer())
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["connected"], false);
    assert_eq!(body["configured"], false);
}

#[tokio::test]
async fn test_save_settings_never_echoes_token() {
    let app = create_test_app().await;

    let response = app
        .server
        .put(INTEGRATION)
        .add_header("Authorization", bearer())
        .json(&json!({
            "apiToken": "super-secret-token",
            "boardIds": { "leads": "111", "orders": "222" }
        }))
        .await;

    response.assert_status_ok();
    assert!(!response.text().contains("super-secret-token"));
    let body = response.json::<Value>();
    assert_eq!(body["connected"], true);
    assert_eq!(body["configured"], true);
    assert_eq!(body["boardIds"]["leads"], "111");

    // A later board-only update keeps the token
    let response = app
        .server
        .put(INTEGRATION)
        .add_header("Authorization", bearer())
        .json(&json!({ "boardIds": { "invoices": "333" } }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["connected"], true);
    assert_eq!(body["boardIds"]["invoices"], "333");
}

#[tokio::test]
async fn test_empty_token_is_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .put(INTEGRATION)
        .add_header("Authorization", bearer())
        .json(&json!({ "apiToken": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_disconnect_clears_token_and_keeps_boards() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;

    let response = app
        .server
        .delete(INTEGRATION)
        .add_header("Authorization", bearer())
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["connected"], false);
    assert_eq!(body["boardIds"]["leads"], "1001");

    let stored = app.ctx.integrations.find("brand-a").await.unwrap().unwrap();
    assert!(stored.api_token.is_none());
}

#[tokio::test]
async fn test_connection_check_reports_account() {
    let app = create_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(header("Authorization", "candidate-token"))
        .and(body_string_contains("me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "me": { "name": "Ops User", "email": "ops@example.test" } }
        })))
        .mount(&app.monday)
        .await;

    let response = app
        .server
        .post("/v1/integrations/monday/test")
        .add_header("Authorization", bearer())
        .json(&json!({ "apiToken": "candidate-token" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "ops@example.test");
}

#[tokio::test]
async fn test_connection_check_reports_failure() {
    let app = create_test_app().await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Not Authenticated"))
        .mount(&app.monday)
        .await;

    let response = app
        .server
        .post("/v1/integrations/monday/test")
        .add_header("Authorization", bearer())
        .json(&json!({ "apiToken": "revoked-token" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_provision_creates_boards_and_saves_ids() {
    let app = create_test_app().await;
    let mut settings = brandsync::domain::models::brand_integration::BrandIntegrationSettings::new(
        "brand-a",
    );
    settings.api_token = Some("tok".to_string());
    app.ctx.integrations.upsert(&settings).await.unwrap();

    mock_mutation(&app, "create_board", "5000").await;
    mock_mutation(&app, "create_column", "col_1").await;

    let response = app
        .server
        .post("/v1/brands/brand-a/integration/monday/provision")
        .add_header("Authorization", bearer())
        .await;

    response.assert_status(StatusCode::CREATED);
    let report = response.json::<Value>();
    assert_eq!(report["boardIds"]["accounts"], "5000");
    assert!(report["boardIds"]["leads"].is_null());
    assert_eq!(report["boardIds"]["activations"], "5000");
    assert!(report["skipped"].as_array().unwrap().is_empty());

    let stored = app.ctx.integrations.find("brand-a").await.unwrap().unwrap();
    assert!(stored.board_ids.any_configured());
}

#[tokio::test]
async fn test_provision_requires_connection() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/brands/brand-a/integration/monday/provision")
        .add_header("Authorization", bearer())
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_sync_history_lists_newest_first() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    mock_mutation(&app, "create_item", "9400").await;

    let first = insert_lead(&app, "brand-a", None).await;
    let second = insert_lead(&app, "brand-a", None).await;
    for id in [first, second] {
        app.server
            .post(&format!("/v1/brands/brand-a/sync/lead/{}", id))
            .add_header("Authorization", bearer())
            .await
            .assert_status_ok();
    }

    let response = app
        .server
        .get("/v1/brands/brand-a/sync-history")
        .add_header("Authorization", bearer())
        .await;

    response.assert_status_ok();
    let history = response.json::<Vec<Value>>();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["details"]["leadId"], second.to_string());
    assert_eq!(history[1]["details"]["leadId"], first.to_string());
    assert_eq!(history[0]["action"], "syncLead");
    assert_eq!(history[0]["direction"], "outbound");
}
