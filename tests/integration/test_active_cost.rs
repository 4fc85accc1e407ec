use actix_web::http::StatusCode;
use chrono::TimeDelta;
use clients_contracts::dtos::ActiveCostDto;
use clients_contracts::evaluator;

use crate::common::*;

#[tokio::test]
async fn test_active_cost_excludes_ended_contracts() {
    let (g, state) = setup_test_app().await;
    let app = test_service!(state);

    let today = evaluator::today();
    let client = seed_person(&g.pool, "sum@example.com").await;
    let start = today - TimeDelta::days(30);
    seed_contract(&g.pool, client.id, start, None, "120.75").await;
    seed_contract(&g.pool, client.id, start, Some(today + TimeDelta::days(15)), "89.25").await;
    seed_contract(&g.pool, client.id, start, Some(today - TimeDelta::days(1)), "300.00").await;

    let (status, body) =
        get_json(&app, &format!("/contracts/clients/{}/active-cost", client.id)).await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["activeCostAmount"].to_string(), "210.00");
    let result: ActiveCostDto = serde_json::from_value(body).unwrap();
    assert_eq!(result.client_id, client.id);
    assert_eq!(result.active_cost_amount, dec("210.00"));
}

#[tokio::test]
async fn test_contract_ending_on_reference_date_counts() {
    let (g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = seed_person(&g.pool, "edge@example.com").await;
    seed_contract(&g.pool, client.id, date(2024, 1, 1), Some(date(2024, 3, 31)), "40.00").await;
    seed_contract(&g.pool, client.id, date(2024, 4, 1), None, "2.50").await;

    let (_, on_end) = get_json(
        &app,
        &format!("/contracts/clients/{}/active-cost?asOf=2024-03-31", client.id),
    )
    .await;
    let (_, day_after) = get_json(
        &app,
        &format!("/contracts/clients/{}/active-cost?asOf=2024-04-01", client.id),
    )
    .await;

    assert_eq!(on_end["activeCostAmount"].as_f64(), Some(40.0));
    assert_eq!(day_after["activeCostAmount"].as_f64(), Some(2.5));
}

#[tokio::test]
async fn test_future_contract_is_not_counted() {
    let (g, state) = setup_test_app().await;
    let app = test_service!(state);

    let today = evaluator::today();
    let client = seed_person(&g.pool, "future@example.com").await;
    seed_contract(&g.pool, client.id, today + TimeDelta::days(1), None, "99.99").await;

    let (status, body) =
        get_json(&app, &format!("/contracts/clients/{}/active-cost", client.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activeCostAmount"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_client_without_contracts_sums_to_zero() {
    let (g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = seed_person(&g.pool, "empty@example.com").await;
    let (status, body) =
        get_json(&app, &format!("/contracts/clients/{}/active-cost", client.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activeCostAmount"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_active_cost_for_unknown_client_is_not_found() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let (status, body) = get_json(&app, "/contracts/clients/5050/active-cost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Client with id 5050 was not found.");
}
