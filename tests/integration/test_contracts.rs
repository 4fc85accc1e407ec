use actix_web::http::{Method, StatusCode};
use chrono::{TimeZone, Utc};
use clients_contracts::evaluator;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_create_contract() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("c1@example.com")).await;
    let contract = create_contract_ok(
        &app,
        json!({
            "clientId": client.id,
            "startDate": "2024-07-01",
            "endDate": "2025-06-30",
            "costAmount": 120.75
        }),
    )
    .await;

    assert_eq!(contract.client_id, client.id);
    assert_eq!(contract.start_date, date(2024, 7, 1));
    assert_eq!(contract.end_date, Some(date(2025, 6, 30)));
    assert_eq!(contract.cost_amount, dec("120.75"));
}

#[tokio::test]
async fn test_start_date_defaults_to_today() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("c2@example.com")).await;
    let contract = create_contract_ok(
        &app,
        json!({ "clientId": client.id, "costAmount": 10 }),
    )
    .await;

    assert_eq!(contract.start_date, evaluator::today());
    assert_eq!(contract.end_date, None);
}

#[tokio::test]
async fn test_zero_cost_is_accepted() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("zero@example.com")).await;
    let contract = create_contract_ok(
        &app,
        json!({ "clientId": client.id, "startDate": "2024-01-01", "costAmount": 0 }),
    )
    .await;

    assert!(contract.cost_amount.is_zero());
}

#[tokio::test]
async fn test_contract_for_unknown_client_is_not_found() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/contracts/create-contract",
        Some(json!({ "clientId": 777, "costAmount": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Client with id 777 was not found.");
}

#[tokio::test]
async fn test_end_before_start_is_rejected() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("range@example.com")).await;
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/contracts/create-contract",
        Some(json!({
            "clientId": client.id,
            "startDate": "2024-06-10",
            "endDate": "2024-06-09",
            "costAmount": 5
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "End date must be on or after the start date.");
}

#[tokio::test]
async fn test_negative_cost_is_rejected() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("neg@example.com")).await;
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/contracts/create-contract",
        Some(json!({ "clientId": client.id, "costAmount": -1.5 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "costAmount");
    assert_eq!(
        body["errors"][0]["message"],
        "Cost amount must be greater than or equal to 0."
    );
}

#[tokio::test]
async fn test_update_contract_cost() {
    let (g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = seed_person(&g.pool, "upd@example.com").await;
    let contract = seed_contract(&g.pool, client.id, date(2024, 1, 1), None, "50.00").await;
    let stamped = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    set_contract_updated_at(&g.pool, contract.id, stamped).await;

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        "/contracts/update-contract",
        Some(json!({ "contractId": contract.id, "costAmount": 75.5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["id"], contract.id);

    let stored = load_contract(&g.pool, contract.id).await;
    assert_eq!(stored.cost_amount, dec("75.50"));
    assert!(stored.updated_at > stamped);
    assert_eq!(stored.start_date, contract.start_date);
    assert_eq!(stored.end_date, None);
}

#[tokio::test]
async fn test_update_unknown_contract_is_not_found() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        "/contracts/update-contract",
        Some(json!({ "contractId": 31337, "costAmount": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Contract with id 31337 was not found.");
}

#[tokio::test]
async fn test_update_without_cost_is_rejected() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let (status, body) = send_json(
        &app,
        Method::PATCH,
        "/contracts/update-contract",
        Some(json!({ "contractId": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Cost amount is required.");
}

#[tokio::test]
async fn test_cost_beyond_column_range_is_a_validation_error() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("huge@example.com")).await;
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/contracts/create-contract",
        Some(json!({ "clientId": client.id, "costAmount": 1_000_000_000_000_000_000u64 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(
        &body,
        StatusCode::BAD_REQUEST,
        "Validation Failed",
        "Cost amount cannot exceed 17 integer digits.",
    );
}

#[tokio::test]
async fn test_large_cost_round_trips_exactly() {
    let (g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("exact@example.com")).await;
    let payload: serde_json::Value = serde_json::from_str(&format!(
        r#"{{"clientId": {}, "startDate": "2024-01-01", "costAmount": 12345678901234567.89}}"#,
        client.id
    ))
    .unwrap();
    let (status, body) =
        send_json(&app, Method::POST, "/contracts/create-contract", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    assert_eq!(body["costAmount"].to_string(), "12345678901234567.89");

    let id = body["id"].as_i64().unwrap();
    let stored = load_contract(&g.pool, id).await;
    assert_eq!(stored.cost_amount, dec("12345678901234567.89"));
}
