pub mod auth;
pub mod notifications;
pub mod shared;
pub mod shifts;
pub mod staff;
pub mod stats;
pub mod timesheets;

use actix_web::web;

/// All routes live under /api. Admin review surfaces sit in /admin,
/// staff-facing surfaces in /staff; handlers enforce the matching role.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/staff")
                    .route(
                        "/available-shifts",
                        web::get().to(shifts::get_available_shifts),
                    )
                    .route(
                        "/shift-requests",
                        web::post().to(shifts::submit_shift_request),
                    )
                    .route(
                        "/shift-requests",
                        web::get().to(shifts::get_my_shift_requests),
                    )
                    .route("/schedule", web::get().to(staff::get_my_schedule))
                    .route("/timesheets", web::post().to(timesheets::create_timesheet))
                    .route("/timesheets", web::get().to(timesheets::get_my_timesheets))
                    .route(
                        "/timesheets/{id}/submit",
                        web::post().to(timesheets::submit_timesheet),
                    )
                    .route(
                        "/notifications",
                        web::get().to(notifications::get_notifications),
                    )
                    .route(
                        "/notifications/{id}/read",
                        web::post().to(notifications::mark_notification_read),
                    )
                    .route(
                        "/notifications/mark-all-read",
                        web::post().to(notifications::mark_all_notifications_read),
                    ),
            )
            .service(
                web::scope("/admin")
                    .route(
                        "/available-shifts",
                        web::post().to(shifts::create_shift),
                    )
                    .route("/available-shifts", web::get().to(shifts::get_shifts))
                    .route(
                        "/available-shifts/{id}",
                        web::put().to(shifts::update_shift),
                    )
                    .route(
                        "/available-shifts/{id}",
                        web::delete().to(shifts::delete_shift),
                    )
                    .route(
                        "/shift-requests",
                        web::get().to(shifts::get_pending_requests),
                    )
                    .route(
                        "/shift-requests/{id}/approve",
                        web::post().to(shifts::approve_shift_request),
                    )
                    .route(
                        "/shift-requests/{id}/reject",
                        web::post().to(shifts::reject_shift_request),
                    )
                    .route(
                        "/timesheets",
                        web::get().to(timesheets::get_timesheets_for_review),
                    )
                    .route(
                        "/timesheets/{id}/approve",
                        web::post().to(timesheets::approve_timesheet),
                    )
                    .route(
                        "/timesheets/{id}/reject",
                        web::post().to(timesheets::reject_timesheet),
                    )
                    .route("/staff", web::post().to(staff::create_staff))
                    .route("/staff", web::get().to(staff::get_staff))
                    .route("/staff/{id}", web::put().to(staff::update_staff))
                    .route(
                        "/stats/dashboard",
                        web::get().to(stats::get_dashboard_stats),
                    ),
            ),
    );
}
