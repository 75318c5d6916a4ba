//! Profile routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use befit_shared::models::{ProfileInput, UserProfile};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(save_profile))
}

/// GET /api/v1/profile - `null` until onboarding is complete
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Option<UserProfile>>> {
    let profile = ProfileService::get_profile(state.db(), &auth.email).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile - targets in the body are ignored and recomputed
async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ProfileInput>,
) -> ApiResult<Json<UserProfile>> {
    let profile = ProfileService::save_profile(state.db(), &auth.email, input).await?;
    Ok(Json(profile))
}
