//! Authentication routes
//!
//! Registration, login, and the current account.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use befit_shared::types::{AccountResponse, AuthSession, LoginRequest, RegisterRequest};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthSession>> {
    let session =
        UserService::register(state.db(), state.jwt(), &req.name, &req.email, &req.password).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthSession>> {
    let session = UserService::login(state.db(), state.jwt(), &req.email, &req.password).await?;
    Ok(Json(session))
}

/// GET /api/v1/auth/me
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<AccountResponse>> {
    let account = UserService::account(state.db(), &auth.email).await?;
    Ok(Json(account))
}
