use actix_web::http::{Method, StatusCode};
use clients_contracts::models::ClientType;
use serde_json::json;

use crate::common::*;

#[tokio::test]
async fn test_create_person() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, person_json("jane@example.com")).await;

    assert!(client.id > 0);
    assert_eq!(client.client_type, ClientType::Person);
    assert_eq!(client.email, "jane@example.com");
    assert_eq!(client.birthdate, Some(date(1990, 4, 12)));
    assert_eq!(client.company_identifier, None);
}

#[tokio::test]
async fn test_create_company() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let client = create_client_ok(&app, company_json("office@acme.example", "CHE-123.456.789")).await;

    assert_eq!(client.client_type, ClientType::Company);
    assert_eq!(client.company_identifier.as_deref(), Some("CHE-123.456.789"));
    assert_eq!(client.birthdate, None);
}

#[tokio::test]
async fn test_blank_company_identifier_makes_a_person() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let mut payload = person_json("blank-ci@example.com");
    payload["companyIdentifier"] = json!("   ");
    let client = create_client_ok(&app, payload).await;

    assert_eq!(client.client_type, ClientType::Person);
    assert_eq!(client.company_identifier, None);
}

#[tokio::test]
async fn test_company_with_birthdate_is_rejected() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let mut payload = company_json("bd@acme.example", "CHE-1");
    payload["birthdate"] = json!("2001-01-01");
    let (status, body) = send_json(&app, Method::POST, "/clients/create-client", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(
        &body,
        StatusCode::BAD_REQUEST,
        "Bad Request",
        "Companies must not include a birthdate.",
    );
}

#[tokio::test]
async fn test_person_without_birthdate_is_rejected() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let mut payload = person_json("nobd@example.com");
    payload.as_object_mut().unwrap().remove("birthdate");
    let (status, body) = send_json(&app, Method::POST, "/clients/create-client", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Persons must include a birthdate.");
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    create_client_ok(&app, person_json("dup@example.com")).await;
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/clients/create-client",
        Some(person_json("DUP@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Client with email DUP@example.com already exists.");
}

#[tokio::test]
async fn test_get_client() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let created = create_client_ok(&app, person_json("get@example.com")).await;
    let (status, body) = get_json(&app, &format!("/clients/{}", created.id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created.id);
    assert_eq!(body["clientType"], "PERSON");
    assert_eq!(body["email"], "get@example.com");
}

#[tokio::test]
async fn test_get_unknown_client_is_not_found() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let (status, body) = get_json(&app, "/clients/424242").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(
        &body,
        StatusCode::NOT_FOUND,
        "Not Found",
        "Client with id 424242 was not found.",
    );
}

#[tokio::test]
async fn test_update_client_overwrites_contact_fields() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let created = create_client_ok(&app, person_json("before@example.com")).await;
    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/clients/update-client",
        Some(json!({
            "id": created.id,
            "email": "after@example.com",
            "phone": "+41 79 999 99 99",
            "name": "Jane Smith"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["email"], "after@example.com");
    assert_eq!(body["phone"], "+41 79 999 99 99");
    assert_eq!(body["name"], "Jane Smith");
    // Fixed at creation.
    assert_eq!(body["birthdate"], "1990-04-12");
    assert_eq!(body["clientType"], "PERSON");
}

#[tokio::test]
async fn test_update_client_may_keep_its_own_email() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let created = create_client_ok(&app, person_json("same@example.com")).await;
    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/clients/update-client",
        Some(json!({
            "id": created.id,
            "email": "Same@Example.com",
            "phone": "+41 79 123 45 67",
            "name": "Jane Doe"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_client_to_taken_email_is_rejected() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    create_client_ok(&app, person_json("taken@example.com")).await;
    let other = create_client_ok(&app, person_json("other@example.com")).await;
    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/clients/update-client",
        Some(json!({
            "id": other.id,
            "email": "taken@example.com",
            "phone": "+41 79 123 45 67",
            "name": "Other"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Client with email taken@example.com already exists.");
}

#[tokio::test]
async fn test_update_unknown_client_is_not_found() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/clients/update-client",
        Some(json!({
            "id": 9999,
            "email": "ghost@example.com",
            "phone": "+41 79 123 45 67",
            "name": "Ghost"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Client with id 9999 was not found.");
}
