//! User repository for database operations

use anyhow::Result;
use befit_shared::models::UserProfile;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub profile: Option<Json<UserProfile>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn has_profile(&self) -> bool {
        self.profile.is_some()
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new account without a profile
    ///
    /// Returns `None` when the email is already registered.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING email, password_hash, name, profile, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Insert a demo account with a ready profile; false if it already existed
    pub async fn insert_seed(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        name: &str,
        profile: &UserProfile,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, name, profile)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(Json(profile))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT email, password_hash, name, profile, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Stored profile for an account, if onboarding has completed
    pub async fn get_profile(pool: &PgPool, email: &str) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_scalar::<_, Option<Json<UserProfile>>>(
            r#"
            SELECT profile FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(profile.flatten().map(|Json(p)| p))
    }

    /// Replace the stored profile; false if the account does not exist
    pub async fn save_profile(pool: &PgPool, email: &str, profile: &UserProfile) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET profile = $2, updated_at = NOW()
            WHERE email = $1
            "#,
        )
        .bind(email)
        .bind(Json(profile))
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
