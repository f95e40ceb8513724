// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{bearer, create_test_app};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_agency_shift_cost_breakdown() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/pricing/agency-shift")
        .add_header("Authorization", bearer())
        .json(&json!({
            "hoursWorked": 3,
            "region": "Long Island",
            "milesTraveled": 10,
            "tollAmount": 15
        }))
        .await;

    response.assert_status_ok();
    let cost = response.json::<Value>();
    assert_eq!(cost["region"], "NYC");
    assert_eq!(cost["billable_hours"], 3);
    assert_eq!(cost["base_fee"].as_f64(), Some(160.0));
    assert_eq!(cost["mileage_cost"].as_f64(), Some(7.0));
    assert_eq!(cost["toll_cost"].as_f64(), Some(15.0));
    assert_eq!(cost["total"].as_f64(), Some(182.0));
}

#[tokio::test]
async fn test_short_shift_billed_at_minimum() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/pricing/agency-shift")
        .add_header("Authorization", bearer())
        .json(&json!({ "hoursWorked": 0.5, "region": "LI" }))
        .await;

    response.assert_status_ok();
    let cost = response.json::<Value>();
    assert_eq!(cost["region"], "LI");
    assert_eq!(cost["billable_hours"], 2);
    assert_eq!(cost["total"].as_f64(), Some(140.0));
}

#[tokio::test]
async fn test_negative_miles_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/pricing/agency-shift")
        .add_header("Authorization", bearer())
        .json(&json!({ "hoursWorked": 4, "milesTraveled": -5 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_amounts_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/v1/pricing/agency-shift")
        .add_header("Authorization", bearer())
        .json(&json!({ "hoursWorked": 3, "milesTraveled": 1e300, "tollAmount": 1e300 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("maximum"));
}
