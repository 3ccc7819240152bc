//! Servicio de autenticación
//!
//! Registro y login con bcrypt, emisión y verificación de JWT.

use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::AuthResponse;
use crate::models::user::{LoginRequest, RegisterRequest, User, UserSummary};
use crate::repositories::UserStore;
use crate::utils::errors::{conflict_error, AppError, AppResult};
use crate::utils::jwt::{generate_token, verify_token, JwtConfig};
use crate::utils::validation::normalize_email;

pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtConfig,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: &EnvironmentConfig) -> Self {
        Self {
            users,
            jwt: JwtConfig::from(config),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(conflict_error("User", "email", &email));
        }

        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;
        let user = self
            .users
            .create(&User::new(request.name.trim().to_string(), email, password_hash))
            .await?;

        info!("👤 Usuario registrado: {}", user.email);
        self.issue(&user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(request.password, user.password_hash.clone()).await? {
            return Err(invalid());
        }

        info!("🔐 Login exitoso: {}", user.email);
        self.issue(&user)
    }

    /// Resolver el usuario de un token Bearer
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = verify_token(token, &self.jwt)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))
    }

    fn issue(&self, user: &User) -> AppResult<AuthResponse> {
        Ok(AuthResponse {
            token: generate_token(user.id, &self.jwt)?,
            user: UserSummary::from(user),
        })
    }
}

async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Hash(e.to_string()))
}
