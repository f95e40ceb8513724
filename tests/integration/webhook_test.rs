// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{
    connect_brand, create_test_app, create_test_app_with, insert_lead, insert_order,
    post_signed_webhook, status_change,
};
use axum::http::StatusCode;
use brandsync::domain::models::local_record::{EntityType, LocalRecord, RecordRef};
use brandsync::domain::models::sync_log::{SyncAction, SyncDirection};
use serde_json::json;

async fn lead_status(app: &super::helpers::TestApp, id: uuid::Uuid) -> Option<String> {
    match app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Lead, id))
        .await
        .unwrap()
    {
        Some(LocalRecord::Lead(lead)) => lead.status,
        other => panic!("expected a lead, got {:?}", other),
    }
}

#[tokio::test]
async fn test_challenge_echoed_and_brand_marked_verified() {
    let app = create_test_app().await;
    connect_brand(&app, "brand-a").await;

    // Handshake is unsigned
    let response = app
        .server
        .post("/webhooks/monday")
        .add_query_param("brandId", "brand-a")
        .json(&json!({ "challenge": "abc123" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "challenge": "abc123" }));

    let settings = app.ctx.integrations.find("brand-a").await.unwrap().unwrap();
    assert!(settings.webhook_verified_at.is_some());
}

#[tokio::test]
async fn test_challenge_for_unknown_brand_creates_no_settings() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/webhooks/monday")
        .add_query_param("brandId", "brand-unknown")
        .json(&json!({ "challenge": "xyz" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "challenge": "xyz" }));
    assert!(app.ctx.integrations.find("brand-unknown").await.unwrap().is_none());
    assert!(app.ctx.integrations.list_brand_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_signature_rejected() {
    let app = create_test_app().await;
    let lead_id = insert_lead(&app, "brand-a", Some("12345")).await;

    let response = app
        .server
        .post("/webhooks/monday")
        .add_query_param("brandId", "brand-a")
        .add_header("Authorization", "deadbeef")
        .json(&status_change(12345, "Won"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/webhooks/monday")
        .add_query_param("brandId", "brand-a")
        .json(&status_change(12345, "Won"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(lead_status(&app, lead_id).await.as_deref(), Some("New"));
    assert!(app.ctx.sync_log.history("brand-a", 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/webhooks/monday")
        .add_query_param("brandId", "brand-a")
        .text("{not json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_brand_id_is_bad_request() {
    let app = create_test_app().await;

    let response = post_signed_webhook(&app, None, &status_change(12345, "Won")).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Missing brandId");
}

#[tokio::test]
async fn test_missing_event_is_bad_request() {
    let app = create_test_app().await;

    let response = post_signed_webhook(&app, Some("brand-a"), &json!({})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Missing event payload");
}

#[tokio::test]
async fn test_status_change_without_label_is_bad_request() {
    let app = create_test_app().await;
    let lead_id = insert_lead(&app, "brand-a", Some("12345")).await;

    let body = json!({
        "event": {
            "type": "update_column_value",
            "columnId": "status",
            "itemId": 12345,
            "value": null
        }
    });
    let response = post_signed_webhook(&app, Some("brand-a"), &body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Missing status label");
    assert_eq!(lead_status(&app, lead_id).await.as_deref(), Some("New"));
}

#[tokio::test]
async fn test_status_change_updates_matching_lead() {
    let app = create_test_app().await;
    let lead_id = insert_lead(&app, "brand-a", Some("12345")).await;

    let response = post_signed_webhook(&app, Some("brand-a"), &status_change(12345, "Won")).await;
    response.assert_status_ok();
    assert_eq!(response.text(), "Webhook processed successfully.");

    assert_eq!(lead_status(&app, lead_id).await.as_deref(), Some("Won"));

    let history = app.ctx.sync_log.history("brand-a", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].direction, SyncDirection::Inbound);
    assert_eq!(history[0].action, SyncAction::WebhookEvent);
    assert!(history[0].success);
    assert_eq!(history[0].details["brandId"], "brand-a");
}

#[tokio::test]
async fn test_item_of_other_brand_is_untouched() {
    let app = create_test_app().await;
    let other_lead = insert_lead(&app, "brand-b", Some("12345")).await;

    let response = post_signed_webhook(&app, Some("brand-a"), &status_change(12345, "Won")).await;

    // Unknown item for this brand: acknowledged and logged, nothing changed
    response.assert_status_ok();
    assert_eq!(lead_status(&app, other_lead).await.as_deref(), Some("New"));
    assert!(app.ctx.sync_log.history("brand-b", 10).await.unwrap().is_empty());

    let history = app.ctx.sync_log.history("brand-a", 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].details["resolution"]["kind"], "no_match");
}

#[tokio::test]
async fn test_replayed_event_is_idempotent() {
    let app = create_test_app().await;
    let lead_id = insert_lead(&app, "brand-a", Some("777")).await;
    let body = status_change(777, "Contacted");

    post_signed_webhook(&app, Some("brand-a"), &body)
        .await
        .assert_status_ok();
    post_signed_webhook(&app, Some("brand-a"), &body)
        .await
        .assert_status_ok();

    assert_eq!(lead_status(&app, lead_id).await.as_deref(), Some("Contacted"));
    assert_eq!(app.ctx.sync_log.history("brand-a", 10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_lead_wins_tie_by_default() {
    let app = create_test_app().await;
    let lead_id = insert_lead(&app, "brand-a", Some("555")).await;
    let order_id = insert_order(&app, "brand-a", Some("555")).await;

    post_signed_webhook(&app, Some("brand-a"), &status_change(555, "Shipped"))
        .await
        .assert_status_ok();

    assert_eq!(lead_status(&app, lead_id).await.as_deref(), Some("Shipped"));
    match app
        .ctx
        .records
        .find(RecordRef::new(EntityType::Order, order_id))
        .await
        .unwrap()
    {
        Some(LocalRecord::Order(order)) => assert_eq!(order.status.as_deref(), Some("Pending")),
        other => panic!("expected an order, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reject_policy_leaves_ambiguous_item_alone() {
    let app = create_test_app_with(&[("webhook.tie_break", "reject")]).await;
    let lead_id = insert_lead(&app, "brand-a", Some("555")).await;
    insert_order(&app, "brand-a", Some("555")).await;

    post_signed_webhook(&app, Some("brand-a"), &status_change(555, "Shipped"))
        .await
        .assert_status_ok();

    assert_eq!(lead_status(&app, lead_id).await.as_deref(), Some("New"));
    let history = app.ctx.sync_log.history("brand-a", 10).await.unwrap();
    assert_eq!(history[0].details["resolution"]["kind"], "ambiguous_match");
}

#[tokio::test]
async fn test_non_status_event_is_logged_without_changes() {
    let app = create_test_app().await;
    let lead_id = insert_lead(&app, "brand-a", Some("12345")).await;

    let body = json!({
        "event": {
            "type": "update_column_value",
            "columnId": "text",
            "itemId": 12345,
            "value": { "value": "free text" }
        }
    });
    post_signed_webhook(&app, Some("brand-a"), &body)
        .await
        .assert_status_ok();

    assert_eq!(lead_status(&app, lead_id).await.as_deref(), Some("New"));
    assert_eq!(app.ctx.sync_log.history("brand-a", 10).await.unwrap().len(), 1);
}
