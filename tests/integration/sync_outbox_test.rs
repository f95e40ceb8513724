// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    bearer, connect_brand, create_test_app, create_test_app_with, insert_lead, insert_order,
    mock_mutation, TestApp, BRAND_TOKEN,
};
use axum::http::StatusCode;
use brandsync::domain::models::brand_integration::BrandIntegrationSettings;
use brandsync::domain::models::local_record::{EntityType, RecordRef};
use brandsync::domain::models::sync_intent::SyncIntentStatus;
use brandsync::workers::sync_outbox_worker::SyncOutboxWorker;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn worker(app: &TestApp) -> SyncOutboxWorker {
    SyncOutboxWorker::new(
        app.ctx.intents.clone(),
        app.ctx.sync_service.clone(),
        &app.ctx.settings.outbox,
    )
}

async fn enqueue(app: &TestApp, brand_id: &str, entity_type: &str, id: Uuid) -> Uuid {
    let response = app
        .server
        .post(&format!(
            "/v1/brands/{}/sync/{}/{}/enqueue",
            brand_id, entity_type, id
        ))
        .add_header("Authorization", bearer())
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    let body = response.json::<Value>();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["attemptCount"], 0);
    body["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_enqueued_intent_is_delivered_by_worker() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;
    mock_mutation(&app, "create_item", "9300").await;

    let intent_id = enqueue(&app, "brand-a", "lead", lead_id).await;

    let processed = worker(&app).process_due_intents().await.unwrap();
    assert_eq!(processed, 1);

    let intent = app.ctx.intents.find_by_id(intent_id).await.unwrap().unwrap();
    assert_eq!(intent.status, SyncIntentStatus::Delivered);
    assert_eq!(intent.attempt_count, 1);
    assert!(intent.delivered_at.is_some());

    let lead = app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Lead, lead_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.monday_item_id(), Some("9300"));

    // Nothing left to do
    assert_eq!(worker(&app).process_due_intents().await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_delivery_is_backed_off() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid board"))
        .mount(&app.monday)
        .await;

    let intent_id = enqueue(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(worker(&app).process_due_intents().await.unwrap(), 1);

    let intent = app.ctx.intents.find_by_id(intent_id).await.unwrap().unwrap();
    assert_eq!(intent.status, SyncIntentStatus::Failed);
    assert_eq!(intent.attempt_count, 1);
    assert!(intent.last_error.is_some());
    assert!(intent.next_attempt_at.unwrap() > Utc::now());

    // Backoff keeps it out of the next batch
    assert_eq!(worker(&app).process_due_intents().await.unwrap(), 0);
}

#[tokio::test]
async fn test_last_attempt_moves_intent_to_dead_letter() {
    let app = create_test_app_with(&[("outbox.max_attempts", "1")]).await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    // Brand is not connected, so every attempt fails
    let intent_id = enqueue(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(worker(&app).process_due_intents().await.unwrap(), 1);

    let intent = app.ctx.intents.find_by_id(intent_id).await.unwrap().unwrap();
    assert_eq!(intent.status, SyncIntentStatus::Dead);
    assert_eq!(intent.attempt_count, 1);
    assert!(intent.next_attempt_at.is_none());
    assert_eq!(worker(&app).process_due_intents().await.unwrap(), 0);
}

#[tokio::test]
async fn test_full_sync_queues_only_unsynced_records() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    insert_lead(&app, "brand-a", None).await;
    insert_lead(&app, "brand-a", None).await;
    insert_order(&app, "brand-a", Some("4242")).await;
    insert_lead(&app, "brand-b", None).await;

    let response = app
        .server
        .post("/v1/brands/brand-a/full-sync")
        .add_header("Authorization", bearer())
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    // Each unsynced lead is queued for the leads board and the accounts board
    let body = response.json::<Value>();
    assert_eq!(body["queued"], 4);
    let intents = body["intents"].as_array().unwrap();
    assert!(intents.iter().all(|intent| intent["brandId"] == "brand-a"));
    let count = |kind: &str| {
        intents
            .iter()
            .filter(|intent| intent["entityType"] == kind)
            .count()
    };
    assert_eq!(count("lead"), 2);
    assert_eq!(count("account"), 2);
}

#[tokio::test]
async fn test_full_sync_skips_boards_that_are_not_configured() {
    let app = create_test_app().await;
    let mut settings = BrandIntegrationSettings::new("brand-a");
    settings.api_token = Some(BRAND_TOKEN.to_string());
    settings.board_ids.leads = Some("1001".to_string());
    app.ctx.integrations.upsert(&settings).await.unwrap();
    insert_lead(&app, "brand-a", None).await;

    let response = app
        .server
        .post("/v1/brands/brand-a/full-sync")
        .add_header("Authorization", bearer())
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    let body = response.json::<Value>();
    assert_eq!(body["queued"], 1);
    assert_eq!(body["intents"][0]["entityType"], "lead");

    // Not connected: nothing is queued
    let response = app
        .server
        .post("/v1/brands/brand-b/full-sync")
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(response.json::<Value>()["queued"], 0);
}

#[tokio::test]
async fn test_repeated_enqueue_reuses_open_intent() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;
    let lead_id = insert_lead(&app, "brand-a", None).await;

    let first = enqueue(&app, "brand-a", "lead", lead_id).await;
    let second = enqueue(&app, "brand-a", "lead", lead_id).await;
    assert_eq!(first, second);

    // A different view of the same lead is its own intent
    let account = enqueue(&app, "brand-a", "account", lead_id).await;
    assert_ne!(first, account);
}

#[tokio::test]
async fn test_repeated_full_sync_creates_item_once() {
    let app = create_test_app().await;
    let mut settings = BrandIntegrationSettings::new("brand-a");
    settings.api_token = Some(BRAND_TOKEN.to_string());
    settings.board_ids.leads = Some("1001".to_string());
    app.ctx.integrations.upsert(&settings).await.unwrap();
    let lead_id = insert_lead(&app, "brand-a", None).await;

    Mock::given(method("POST"))
        .and(path("/v2"))
        .and(body_string_contains("create_item"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "create_item": { "id": "9500" } } })),
        )
        .expect(1)
        .mount(&app.monday)
        .await;

    for _ in 0..2 {
        app.server
            .post("/v1/brands/brand-a/full-sync")
            .add_header("Authorization", bearer())
            .await
            .assert_status(StatusCode::ACCEPTED);
    }

    assert_eq!(worker(&app).process_due_intents().await.unwrap(), 1);
    assert_eq!(worker(&app).process_due_intents().await.unwrap(), 0);

    let lead = app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Lead, lead_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lead.monday_item_id(), Some("9500"));

    // Synced now, so a third full sync has nothing to queue
    let response = app
        .server
        .post("/v1/brands/brand-a/full-sync")
        .add_header("Authorization", bearer())
        .await;
    assert_eq!(response.json::<Value>()["queued"], 0);
}
