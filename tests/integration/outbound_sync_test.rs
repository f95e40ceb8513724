// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    bearer, connect_brand, create_test_app, insert_lead, insert_order, mock_mutation, TestApp,
    BRAND_TOKEN,
};
use axum::http::StatusCode;
use brandsync::domain::models::local_record::{EntityType, LocalRecord, RecordRef};
use brandsync::domain::models::sync_log::{SyncAction, SyncDirection};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn sync_now(app: &TestApp, brand_id: &str, entity_type: &str, id: Uuid) -> Value {
    let response = app
        .server
        .post(&format!("/v1/brands/{}/sync/{}/{}", brand_id, entity_type, id))
        .add_header("Authorization", bearer())
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[tokio::test]
async fn test_new_lead_creates_item_and_records_id() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(header("Authorization", BRAND_TOKEN))
        .and(body_string_contains("create_item"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "create_item": { "id": "9001" } } })),
        )
        .expect(1)
        .mount(&app.monday)
        .await;

    let outcome = sync_now(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["mondayItemId"], "9001");

    let stored = app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Lead, lead_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.monday_item_id(), Some("9001"));

    let history = app.ctx.sync_log.history("brand-a", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].direction, SyncDirection::Outbound);
    assert_eq!(history[0].action, SyncAction::SyncLead);
    assert!(history[0].success);
    assert_eq!(history[0].details["leadId"], lead_id.to_string());
    assert_eq!(history[0].details["mondayItemId"], "9001");

    let settings = app.ctx.integrations.find("brand-a").await.unwrap().unwrap();
    let last_sync = settings.last_sync.expect("last sync recorded");
    assert!(last_sync.success);
    assert_eq!(last_sync.action, SyncAction::SyncLead);
}

#[tokio::test]
async fn test_already_synced_order_updates_existing_item() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let order_id = insert_order(&app, "brand-a", Some("4242")).await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(body_string_contains("change_multiple_column_values"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "data": { "change_multiple_column_values": { "id": "4242" } } }),
        ))
        .expect(1)
        .mount(&app.monday)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("create_item"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.monday)
        .await;

    let outcome = sync_now(&app, "brand-a", "order", order_id).await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["mondayItemId"], "4242");
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad column value"))
        .expect(1)
        .mount(&app.monday)
        .await;

    let outcome = sync_now(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(outcome["success"], false);
    assert!(outcome["error"].as_str().unwrap().contains("400"));

    let history = app.ctx.sync_log.history("brand-a", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].success);
    assert!(history[0].error.is_some());

    let stored = app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Lead, lead_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.monday_item_id(), None);
}

#[tokio::test]
async fn test_server_error_is_retried_until_success() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    // First match wins; after two 503s the success mock takes over
    Mock::given(method("POST"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&app.monday)
        .await;
    mock_mutation(&app, "create_item", "9100").await;

    let outcome = sync_now(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["mondayItemId"], "9100");
}

#[tokio::test]
async fn test_throttled_graphql_error_is_retried() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "errors": [{ "message": "Complexity budget exhausted" }] }),
        ))
        .up_to_n_times(1)
        .expect(1)
        .mount(&app.monday)
        .await;
    mock_mutation(&app, "create_item", "9200").await;

    let outcome = sync_now(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(outcome["success"], true);
}

#[tokio::test]
async fn test_disconnected_brand_logs_failure_without_calling_monday() {
    let app = create_test_app().await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.monday)
        .await;

    let outcome = sync_now(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(outcome["success"], false);
    assert!(outcome["error"]
        .as_str()
        .unwrap()
        .contains("not connected"));

    let history = app.ctx.sync_log.history("brand-a", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].success);
}

#[tokio::test]
async fn test_record_of_other_brand_is_refused() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let foreign_lead = insert_lead(&app, "brand-b", None).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.monday)
        .await;

    let outcome = sync_now(&app, "brand-a", "lead", foreign_lead).await;
    assert_eq!(outcome["success"], false);

    match app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Lead, foreign_lead))
        .await
        .unwrap()
    {
        Some(LocalRecord::Lead(lead)) => assert!(lead.monday_item_id.is_none()),
        other => panic!("expected a lead, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_entity_type_is_bad_request() {
    let app = create_test_app().await;

    let response = app
        .server
        .post(&format!("/v1/brands/brand-a/sync/sale/{}", Uuid::new_v4()))
        .add_header("Authorization", bearer())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_account_sync_uses_accounts_board_and_keeps_lead_item() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", Some("7001")).await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(body_string_contains("create_item"))
        .and(body_string_contains("1005"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "create_item": { "id": "8001" } } })),
        )
        .expect(1)
        .mount(&app.monday)
        .await;

    let outcome = app.ctx.sync_service.sync_account("brand-a", lead_id).await;
    assert!(outcome.success);
    assert_eq!(outcome.monday_item_id.as_deref(), Some("8001"));

    match app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Lead, lead_id))
        .await
        .unwrap()
    {
        Some(LocalRecord::Lead(lead)) => {
            assert_eq!(lead.monday_item_id.as_deref(), Some("7001"));
            assert_eq!(lead.monday_account_item_id.as_deref(), Some("8001"));
            assert!(lead.monday_account_synced_at.is_some());
        }
        other => panic!("expected a lead, got {:?}", other),
    }

    let history = app.ctx.sync_log.history("brand-a", 10).await.unwrap();
    assert_eq!(history[0].action, SyncAction::SyncAccount);
    assert_eq!(history[0].details["leadId"], lead_id.to_string());
}

#[tokio::test]
async fn test_account_resync_updates_existing_account_item() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;
    mock_mutation(&app, "create_item", "8100").await;

    let outcome = sync_now(&app, "brand-a", "account", lead_id).await;
    assert_eq!(outcome["mondayItemId"], "8100");

    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(body_string_contains("change_multiple_column_values"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "data": { "change_multiple_column_values": { "id": "8100" } } }),
        ))
        .expect(1)
        .mount(&app.monday)
        .await;

    let outcome = sync_now(&app, "brand-a", "account", lead_id).await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["mondayItemId"], "8100");
}
