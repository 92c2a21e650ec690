mod common;

use actix_web::test;
use chrono::{Datelike, Months, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use careportal::database::models::StaffRole;
use careportal::database::repositories::NotificationRepository;
use careportal::handlers::shared::ApiResponse;
use common::*;

fn entry_payload(work_date: chrono::NaiveDate, submit: bool) -> serde_json::Value {
    json!({
        "workDate": work_date,
        "startTime": "09:00",
        "endTime": "17:00",
        "breakMinutes": 30,
        "serviceType": "community_access",
        "location": "12 Example St, Brisbane",
        "submit": submit
    })
}

#[actix_web::test]
async fn entries_are_created_as_draft_or_submitted() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    let token = token_for(&user, &config);
    let today = Utc::now().date_naive();

    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .set_json(entry_payload(today, false))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let draft = body.data.unwrap();
    assert_eq!(draft["status"], "DRAFT");
    assert!(draft["submittedAt"].is_null());
    // 8h minus the 30-minute break.
    assert_eq!(draft["totalHours"].as_f64().unwrap(), 7.5);

    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .set_json(entry_payload(today, true))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let submitted = body.data.unwrap();
    assert_eq!(submitted["status"], "SUBMITTED");
    assert!(!submitted["submittedAt"].is_null());
}

#[actix_web::test]
async fn invalid_time_ranges_are_rejected() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    let token = token_for(&user, &config);
    let today = Utc::now().date_naive();

    // End before start never wraps for timesheets.
    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .set_json(json!({
            "workDate": today,
            "startTime": "17:00",
            "endTime": "09:00",
            "serviceType": "community_access",
            "location": "12 Example St, Brisbane"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.error.unwrap(), "Invalid time range");

    // Break swallowing the whole shift.
    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .set_json(json!({
            "workDate": today,
            "startTime": "09:00",
            "endTime": "10:00",
            "breakMinutes": 90,
            "serviceType": "community_access",
            "location": "12 Example St, Brisbane"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Negative break.
    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .set_json(json!({
            "workDate": today,
            "startTime": "09:00",
            "endTime": "17:00",
            "breakMinutes": -10,
            "serviceType": "community_access",
            "location": "12 Example St, Brisbane"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.error.unwrap(), "Break minutes cannot be negative");
}

#[actix_web::test]
async fn summary_counts_submitted_and_approved_hours_only() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let admin = create_admin(&db.pool, "admin@example.com").await;
    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    let token = token_for(&user, &config);

    // Today is always inside both the week and the month window.
    let in_window = Utc::now().date_naive();

    // One submitted (7.5h), one draft (7.5h, must not count).
    for submit in [true, false] {
        let req = test::TestRequest::post()
            .uri("/api/staff/timesheets")
            .insert_header(auth_header(&token))
            .set_json(entry_payload(in_window, submit))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    // One submitted then approved (7.5h, still counts).
    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .set_json(entry_payload(in_window, true))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let approved_id = body.data.unwrap()["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/timesheets/{}/approve", approved_id))
        .insert_header(auth_header(&token_for(&admin, &config)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let data = body.data.unwrap();

    assert_eq!(data["entries"].as_array().unwrap().len(), 3);
    let summary = &data["summary"];
    assert_eq!(summary["weekHours"].as_f64().unwrap(), 15.0);
    assert_eq!(summary["monthHours"].as_f64().unwrap(), 15.0);
    assert_eq!(summary["pendingCount"].as_i64().unwrap(), 1);
    assert_eq!(summary["approvedCount"].as_i64().unwrap(), 1);
}

#[actix_web::test]
async fn summary_is_zero_before_any_entries_exist() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;

    let req = test::TestRequest::get()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token_for(&user, &config)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let data = body.data.unwrap();

    assert!(data["entries"].as_array().unwrap().is_empty());
    let summary = &data["summary"];
    assert_eq!(summary["weekHours"].as_f64().unwrap(), 0.0);
    assert_eq!(summary["monthHours"].as_f64().unwrap(), 0.0);
    assert_eq!(summary["pendingCount"].as_i64().unwrap(), 0);
    assert_eq!(summary["approvedCount"].as_i64().unwrap(), 0);
}

#[actix_web::test]
async fn month_hours_cover_entries_later_in_the_month() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    let token = token_for(&user, &config);

    let today = Utc::now().date_naive();
    let month_end = today
        .with_day(1)
        .unwrap()
        .checked_add_months(Months::new(1))
        .unwrap()
        .pred_opt()
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .set_json(entry_payload(month_end, true))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let summary = body.data.unwrap()["summary"].clone();
    assert_eq!(summary["monthHours"].as_f64().unwrap(), 7.5);
}

#[actix_web::test]
async fn drafts_can_be_submitted_exactly_once_by_their_owner() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let (owner, _) = create_staff_member(&db.pool, "owner@example.com", StaffRole::SupportWorker).await;
    let (other, _) = create_staff_member(&db.pool, "other@example.com", StaffRole::SupportWorker).await;
    let owner_token = token_for(&owner, &config);
    let today = Utc::now().date_naive();

    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&owner_token))
        .set_json(entry_payload(today, false))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let entry_id = body.data.unwrap()["id"].as_str().unwrap().to_string();

    // Another staff member cannot submit it.
    let req = test::TestRequest::post()
        .uri(&format!("/api/staff/timesheets/{}/submit", entry_id))
        .insert_header(auth_header(&token_for(&other, &config)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // The owner can, once.
    let req = test::TestRequest::post()
        .uri(&format!("/api/staff/timesheets/{}/submit", entry_id))
        .insert_header(auth_header(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.data.unwrap()["status"], "SUBMITTED");

    let req = test::TestRequest::post()
        .uri(&format!("/api/staff/timesheets/{}/submit", entry_id))
        .insert_header(auth_header(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.error.unwrap(), "Only draft entries can be submitted");
}

#[actix_web::test]
async fn review_is_limited_to_submitted_entries() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let admin = create_admin(&db.pool, "admin@example.com").await;
    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    let admin_token = token_for(&admin, &config);
    let today = Utc::now().date_naive();

    // A draft cannot be reviewed.
    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token_for(&user, &config)))
        .set_json(entry_payload(today, false))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let draft_id = body.data.unwrap()["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/timesheets/{}/approve", draft_id))
        .insert_header(auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    assert_eq!(body.error.unwrap(), "Only submitted entries can be reviewed");

    // Unknown id is a 404, not a 400.
    let req = test::TestRequest::post()
        .uri("/api/admin/timesheets/no-such-entry/approve")
        .insert_header(auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn rejection_keeps_notes_and_notifies_the_owner() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let admin = create_admin(&db.pool, "admin@example.com").await;
    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    let today = Utc::now().date_naive();

    let req = test::TestRequest::post()
        .uri("/api/staff/timesheets")
        .insert_header(auth_header(&token_for(&user, &config)))
        .set_json(entry_payload(today, true))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let entry_id = body.data.unwrap()["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/timesheets/{}/reject", entry_id))
        .insert_header(auth_header(&token_for(&admin, &config)))
        .set_json(json!({ "notes": "Hours exceed the roster" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: ApiResponse<serde_json::Value> = test::read_body_json(resp).await;
    let entry = body.data.unwrap();
    assert_eq!(entry["status"], "REJECTED");
    assert_eq!(entry["rejectionNotes"].as_str().unwrap(), "Hours exceed the roster");

    let inbox = NotificationRepository::new(db.pool.clone())
        .list_recent(&user.id)
        .await
        .unwrap();
    assert!(inbox.iter().any(|n| n.title == "Timesheet rejected"));
}

#[actix_web::test]
async fn admin_review_queue_defaults_to_submitted_entries() {
    let db = TestDb::new().await.unwrap();
    let config = test_config();
    let app = init_app(&db.pool, &config).await;

    let admin = create_admin(&db.pool, "admin@example.com").await;
    let (user, _staff) = create_staff_member(&db.pool, "worker@example.com", StaffRole::SupportWorker).await;
    let token = token_for(&user, &config);
    let today = Utc::now().date_naive();

    for submit in [true, false] {
        let req = test::TestRequest::post()
            .uri("/api/staff/timesheets")
            .insert_header(auth_header(&token))
            .set_json(entry_payload(today, submit))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/api/admin/timesheets")
        .insert_header(auth_header(&token_for(&admin, &config)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: ApiResponse<Vec<serde_json::Value>> = test::read_body_json(resp).await;
    let entries = body.data.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["status"], "SUBMITTED");
}
