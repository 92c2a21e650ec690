use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};
use anyhow::{anyhow, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

use crate::config::Config;
use crate::database::models::{
    AccountRole, AuthResponse, LoginRequest, RegisterRequest, User, UserType,
};
use crate::database::repositories::UserRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub user_type: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Admin surface requires an internal account with the admin role.
    pub fn is_admin(&self) -> bool {
        self.user_type.to_lowercase() == "internal" && self.role.to_lowercase() == "admin"
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        if let Some(auth_str) = auth_header {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                if let Some(config) = req.app_data::<Data<Config>>() {
                    match decode::<Claims>(
                        token,
                        &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                        &Validation::new(Algorithm::HS256),
                    ) {
                        Ok(token_data) => return ready(Ok(token_data.claims)),
                        Err(_) => return ready(Err(AppError::Unauthorized)),
                    }
                }
            }
        }

        ready(Err(AppError::Unauthorized))
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    /// Public registration creates staff-type member accounts; internal
    /// admin accounts come from the environment seed. Business rejections
    /// come back as 4xx variants; storage failures stay 500s.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        if self.user_repository.email_exists(&request.email).await? {
            return Err(AppError::BadRequest("Email already exists".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)?;
        let user = User::new(
            request.email,
            password_hash,
            request.name,
            UserType::Staff,
            AccountRole::Member,
        );

        self.user_repository.create_user(&user).await?;

        let token = self.generate_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(&user)?;
        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub fn generate_token(&self, user: &User) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| anyhow!("Invalid token expiry"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            user_type: user.user_type.to_string(),
            role: user.role.to_string(),
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }

    /// Create the internal admin account named in the environment, if any
    /// and not already present. Runs once at startup.
    pub async fn ensure_seed_admin(&self) -> Result<()> {
        let (email, password) = match (&self.config.admin_email, &self.config.admin_password) {
            (Some(email), Some(password)) => (email.clone(), password.clone()),
            _ => return Ok(()),
        };

        if self.user_repository.email_exists(&email).await? {
            return Ok(());
        }

        let password_hash = hash(&password, DEFAULT_COST)?;
        let admin = User::new(
            email.clone(),
            password_hash,
            "Administrator".to_string(),
            UserType::Internal,
            AccountRole::Admin,
        );
        self.user_repository.create_user(&admin).await?;
        log::info!("Seeded admin account {}", email);

        Ok(())
    }
}
