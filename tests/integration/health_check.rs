// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_app;
use axum::http::StatusCode;

#[tokio::test]
async fn test_health_and_version_are_public() {
    let app = create_test_app().await;

    let health = app.server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.text(), "OK");

    let version = app.server.get("/v1/version").await;
    version.assert_status_ok();
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_operator_routes_require_api_key() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/v1/brands/brand-a/integration/monday")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/v1/brands/brand-a/integration/monday")
        .add_header("Authorization", "Bearer not-a-real-key")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
