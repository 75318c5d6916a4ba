//! Account service: registration, login, and the current account
//!
//! Password hashing and verification run on the blocking thread pool.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use befit_shared::types::{AccountResponse, AuthSession};
use befit_shared::validation::{normalize_email, validate_email, validate_name, validate_password};
use sqlx::PgPool;
use tracing::info;

pub const DUPLICATE_ACCOUNT: &str = "User already exists";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct UserService;

impl UserService {
    /// Register a new account and open a session for it
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let email = normalize_email(email);
        validate_email(&email).map_err(ApiError::Validation)?;
        validate_password(password).map_err(ApiError::Validation)?;
        validate_name(name).map_err(ApiError::Validation)?;

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict(DUPLICATE_ACCOUNT.to_string()));
        }

        let password_hash = PasswordService::hash_async(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        // A concurrent registration can still win between the check and the insert
        let user = UserRepository::create(pool, &email, &password_hash, name.trim())
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Conflict(DUPLICATE_ACCOUNT.to_string()))?;

        info!(email = %user.email, "Account registered");
        Self::session(jwt_service, &user.email, &user.name)
    }

    /// Verify credentials and open a session
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let email = normalize_email(email);
        let user = UserRepository::find_by_email(pool, &email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        let valid = PasswordService::verify_async(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        Self::session(jwt_service, &user.email, &user.name)
    }

    /// Account details for an authenticated session
    pub async fn account(pool: &PgPool, email: &str) -> Result<AccountResponse, ApiError> {
        let user = UserRepository::find_by_email(pool, email)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(AccountResponse {
            has_profile: user.has_profile(),
            email: user.email,
            name: user.name,
        })
    }

    fn session(jwt_service: &JwtService, email: &str, name: &str) -> Result<AuthSession, ApiError> {
        let token = jwt_service
            .generate_session_token(email)
            .map_err(ApiError::Internal)?;

        Ok(AuthSession {
            token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.expiry_secs(),
            email: email.to_string(),
            name: name.to_string(),
        })
    }
}
