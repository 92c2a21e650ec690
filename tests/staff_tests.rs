mod common;

use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::json;

use careportal::database::models::{AccountRole, StaffRole, UserType};
use careportal::database::repositories::ShiftRequestRepository;
use careportal::handlers::shared::ApiResponse;
use common::*;

#[actix_web::test]
async fn admin_links_a_staff_profile_to_an_existing_user() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let admin = create_admin(&db.pool, "admin@example.com").await;
    let user = create_user(&db.pool, "new@example.com", UserType::Staff, AccountRole::Member).await;
    let admin_token = token_for(&admin, &config);

    let req = test::TestRequest::post()
        .uri("/api/admin/staff")
        .insert_header(auth_header(&admin_token))
        .set_json(json!({ "userId": user.id, "role": "SUPPORT_WORKER" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let staff = body.data.unwrap();
    assert_eq!(staff["userId"].as_str().unwrap(), user.id);
    assert_eq!(staff["role"], "SUPPORT_WORKER");
    assert_eq!(staff["isActive"], true);

    // One profile per user.
    let req = test::TestRequest::post()
        .uri("/api/admin/staff")
        .insert_header(auth_header(&admin_token))
        .set_json(json!({ "userId": user.id, "role": "COORDINATOR" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // And the user must exist.
    let req = test::TestRequest::post()
        .uri("/api/admin/staff")
        .insert_header(auth_header(&admin_token))
        .set_json(json!({ "userId": "no-such-user", "role": "SUPPORT_WORKER" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn admin_updates_role_and_active_flag() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let admin = create_admin(&db.pool, "admin@example.com").await;
    let (_, staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/staff/{}", staff.id))
        .insert_header(auth_header(&token_for(&admin, &config)))
        .set_json(json!({ "role": "ENROLLED_NURSE", "isActive": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let updated = body.data.unwrap();
    assert_eq!(updated["role"], "ENROLLED_NURSE");
    assert_eq!(updated["isActive"], false);
}

#[actix_web::test]
async fn schedule_lists_only_the_callers_assigned_shifts() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let (winner_user, winner_staff) =
        create_staff_member(&db.pool, "winner@example.com", StaffRole::SupportWorker).await;
    let (other_user, _) =
        create_staff_member(&db.pool, "other@example.com", StaffRole::SupportWorker).await;
    let shift = create_open_shift(&db.pool, ShiftFixture::default()).await;

    let request_repo = ShiftRequestRepository::new(db.pool.clone());
    let request = request_repo
        .create_request(&winner_staff.id, &shift.id, None)
        .await
        .unwrap();
    request_repo.approve_request(&request.id).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/staff/schedule")
        .insert_header(auth_header(&token_for(&winner_user, &config)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: ApiResponse<Vec<serde_json::Value>> = test::read_body_json(resp).await;
    let schedule = body.data.unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0]["status"], "SCHEDULED");

    let req = test::TestRequest::get()
        .uri("/api/staff/schedule")
        .insert_header(auth_header(&token_for(&other_user, &config)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<Vec<serde_json::Value>> = test::read_body_json(resp).await;
    assert!(body.data.unwrap().is_empty());
}
