use crate::common::*;

#[tokio::test]
async fn test_health_check() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let req = actix_web::test::TestRequest::get()
        .uri("/health")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert!(resp.status().is_success());

    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_readiness_check() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let req = actix_web::test::TestRequest::get()
        .uri("/ready")
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;

    assert!(resp.status().is_success());

    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_welcome_banner() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let req = actix_web::test::TestRequest::get().uri("/").to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = actix_web::test::read_body(resp).await;
    assert_eq!(&body[..], b"Welcome to Clients Contracts API!");
}

#[tokio::test]
async fn test_openapi_document_lists_endpoints() {
    let (_g, state) = setup_test_app().await;
    let app = test_service!(state);

    let (status, body) = get_json(&app, "/api-docs/openapi.json").await;
    assert!(status.is_success());
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/clients/create-client"));
    assert!(paths.contains_key("/contracts/clients/{client_id}/active-cost"));
}
