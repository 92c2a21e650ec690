mod common;

use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use careportal::database::models::StaffRole;
use careportal::handlers::shared::ApiResponse;
use common::*;

#[actix_web::test]
async fn registration_creates_a_staff_member_account() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "new@example.com",
            "password": "password123",
            "name": "New Worker"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let data = body.data.unwrap();
    assert!(!data["token"].as_str().unwrap().is_empty());
    assert_eq!(data["user"]["userType"], "STAFF");
    assert_eq!(data["user"]["role"], "MEMBER");

    // Duplicate email is rejected.
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "new@example.com",
            "password": "password123",
            "name": "New Worker"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.error.unwrap(), "Email already exists");
}

#[actix_web::test]
async fn storage_failures_surface_as_500_not_as_rejections() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    db.pool.close().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "new@example.com",
            "password": "password123",
            "name": "New Worker"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.error.unwrap(), "Database error");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "worker@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);
}

#[actix_web::test]
async fn login_checks_the_password() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "worker@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "worker@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn me_returns_the_caller_without_the_password_hash() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let (user, _) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(auth_header(&token_for(&user, &config)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let data = body.data.unwrap();
    assert_eq!(data["email"], "worker@example.com");
    assert!(data.get("passwordHash").is_none());
    assert!(data.get("password_hash").is_none());

    // A garbage token is a 401.
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
