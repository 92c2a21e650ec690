#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;

use careportal::database::init_database;
use careportal::database::models::{
    AccountRole, AvailabilityMatrix, AvailableShift, NewAvailableShift, Staff, StaffInput,
    StaffRole, User, UserType,
};
use careportal::database::repositories::{
    AvailableShiftRepository, NotificationRepository, ShiftRequestRepository, StaffRepository,
    StaffShiftRepository, StatsRepository, TimesheetRepository, UserRepository,
};
use careportal::handlers::configure_routes;
use careportal::services::Notifier;
use careportal::{AuthService, Config};

pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        Ok(TestDb {
            pool,
            _temp_dir: temp_dir,
        })
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        jwt_expiration_days: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        client_base_url: "http://localhost:3000".to_string(),
        admin_email: None,
        admin_password: None,
    }
}

/// Full application wired against the test database, routes included.
pub async fn init_app(
    pool: &SqlitePool,
    config: &Config,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let user_repository = UserRepository::new(pool.clone());
    let notification_repository = NotificationRepository::new(pool.clone());
    let auth_service = AuthService::new(user_repository.clone(), config.clone());
    let notifier = Notifier::new(notification_repository.clone());

    test::init_service(
        App::new()
            .app_data(web::Data::new(user_repository))
            .app_data(web::Data::new(StaffRepository::new(pool.clone())))
            .app_data(web::Data::new(AvailableShiftRepository::new(pool.clone())))
            .app_data(web::Data::new(ShiftRequestRepository::new(pool.clone())))
            .app_data(web::Data::new(StaffShiftRepository::new(pool.clone())))
            .app_data(web::Data::new(TimesheetRepository::new(pool.clone())))
            .app_data(web::Data::new(notification_repository))
            .app_data(web::Data::new(StatsRepository::new(pool.clone())))
            .app_data(web::Data::new(auth_service))
            .app_data(web::Data::new(notifier))
            .app_data(web::Data::new(config.clone()))
            .configure(configure_routes),
    )
    .await
}

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    user_type: UserType,
    role: AccountRole,
) -> User {
    let user_repo = UserRepository::new(pool.clone());
    let password_hash = bcrypt::hash("password123", 4).expect("Failed to hash password");
    let user = User::new(
        email.to_string(),
        password_hash,
        "Test User".to_string(),
        user_type,
        role,
    );
    user_repo
        .create_user(&user)
        .await
        .expect("Failed to insert test user");
    user
}

pub async fn create_admin(pool: &SqlitePool, email: &str) -> User {
    create_user(pool, email, UserType::Internal, AccountRole::Admin).await
}

/// Staff account plus linked staff profile, active by default.
pub async fn create_staff_member(
    pool: &SqlitePool,
    email: &str,
    role: StaffRole,
) -> (User, Staff) {
    let user = create_user(pool, email, UserType::Staff, AccountRole::Member).await;
    let staff_repo = StaffRepository::new(pool.clone());
    let staff = staff_repo
        .create_staff(StaffInput {
            user_id: user.id.clone(),
            role,
            certifications: None,
            availability: AvailabilityMatrix::default(),
        })
        .await
        .expect("Failed to insert staff profile");
    (user, staff)
}

pub struct ShiftFixture {
    pub shift_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub service_type: String,
    pub required_role: Option<StaffRole>,
}

impl Default for ShiftFixture {
    fn default() -> Self {
        Self {
            shift_date: Utc::now().date_naive() + Duration::days(7),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            service_type: "community_access".to_string(),
            required_role: None,
        }
    }
}

pub async fn create_open_shift(pool: &SqlitePool, fixture: ShiftFixture) -> AvailableShift {
    let shift_repo = AvailableShiftRepository::new(pool.clone());
    shift_repo
        .create_shift(NewAvailableShift {
            shift_date: fixture.shift_date,
            start_time: fixture.start_time,
            end_time: fixture.end_time,
            duration_minutes: 480,
            service_type: fixture.service_type,
            location: "12 Example St, Brisbane".to_string(),
            required_role: fixture.required_role,
            required_skills: vec![],
            participant_id: None,
            notes: None,
        })
        .await
        .expect("Failed to insert test shift")
}

pub fn token_for(user: &User, config: &Config) -> String {
    let claims = careportal::services::Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        user_type: user.user_type.to_string(),
        role: user.role.to_string(),
        exp: (Utc::now() + Duration::days(1)).timestamp() as usize,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .expect("Failed to sign test token")
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
