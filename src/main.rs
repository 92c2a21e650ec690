use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use careportal::database::{
    init_database,
    repositories::{
        AvailableShiftRepository, NotificationRepository, ShiftRequestRepository, StaffRepository,
        StaffShiftRepository, StatsRepository, TimesheetRepository, UserRepository,
    },
};
use careportal::handlers::configure_routes;
use careportal::middleware::{CacheControl, RequestId};
use careportal::services::Notifier;
use careportal::{AuthService, Config};

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let user_repository = UserRepository::new(pool.clone());
    let staff_repository = StaffRepository::new(pool.clone());
    let shift_repository = AvailableShiftRepository::new(pool.clone());
    let shift_request_repository = ShiftRequestRepository::new(pool.clone());
    let staff_shift_repository = StaffShiftRepository::new(pool.clone());
    let timesheet_repository = TimesheetRepository::new(pool.clone());
    let notification_repository = NotificationRepository::new(pool.clone());
    let stats_repository = StatsRepository::new(pool.clone());

    let auth_service = AuthService::new(user_repository.clone(), config.clone());
    auth_service.ensure_seed_admin().await?;

    let notifier = Notifier::new(notification_repository.clone());

    let user_repo_data = web::Data::new(user_repository);
    let staff_repo_data = web::Data::new(staff_repository);
    let shift_repo_data = web::Data::new(shift_repository);
    let shift_request_repo_data = web::Data::new(shift_request_repository);
    let staff_shift_repo_data = web::Data::new(staff_shift_repository);
    let timesheet_repo_data = web::Data::new(timesheet_repository);
    let notification_repo_data = web::Data::new(notification_repository);
    let stats_repo_data = web::Data::new(stats_repository);
    let auth_service_data = web::Data::new(auth_service);
    let notifier_data = web::Data::new(notifier);
    let config_data = web::Data::new(config.clone());

    let client_base_url = config.client_base_url.clone();
    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(user_repo_data.clone())
            .app_data(staff_repo_data.clone())
            .app_data(shift_repo_data.clone())
            .app_data(shift_request_repo_data.clone())
            .app_data(staff_shift_repo_data.clone())
            .app_data(timesheet_repo_data.clone())
            .app_data(notification_repo_data.clone())
            .app_data(stats_repo_data.clone())
            .app_data(auth_service_data.clone())
            .app_data(notifier_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(CacheControl)
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(health)
            .configure(configure_routes)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
