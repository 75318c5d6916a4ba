//! AI coach routes
//!
//! Plain async handlers: when the client disconnects the handler future is
//! dropped together with its in-flight model call.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{CoachService, DiaryService, ProfileService};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use befit_shared::models::UserProfile;
use befit_shared::types::{
    AnalyzeMealRequest, ChatReply, ChatRequest, DietAdjustment, MealAnalysis, MealImageRequest,
    MealImageResponse, MealPlan,
};

/// Meal photos arrive base64-encoded in JSON
const MAX_COACH_BODY_BYTES: usize = 12 * 1024 * 1024;

pub fn coach_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_meal))
        .route("/meal-plan", post(meal_plan))
        .route("/meal-image", post(meal_image))
        .route("/chat", post(chat))
        .route("/adjustments", get(adjustments))
        .layer(DefaultBodyLimit::max(MAX_COACH_BODY_BYTES))
}

async fn require_profile(state: &AppState, email: &str) -> ApiResult<UserProfile> {
    ProfileService::get_profile(state.db(), email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found; complete onboarding first".to_string()))
}

/// POST /api/v1/coach/analyze
async fn analyze_meal(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<AnalyzeMealRequest>,
) -> ApiResult<Json<MealAnalysis>> {
    let analysis = CoachService::analyze_meal(state.ai(), req).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/coach/meal-plan
async fn meal_plan(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<MealPlan>> {
    let profile = require_profile(&state, &auth.email).await?;
    Ok(Json(CoachService::meal_plan(state.ai(), &profile).await))
}

/// POST /api/v1/coach/meal-image
async fn meal_image(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<MealImageRequest>,
) -> ApiResult<Json<MealImageResponse>> {
    let image = CoachService::meal_image(state.ai(), &req.meal_name).await?;
    Ok(Json(MealImageResponse { image }))
}

/// POST /api/v1/coach/chat
async fn chat(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatReply>> {
    let reply = CoachService::chat(state.ai(), &req.history, &req.message).await?;
    Ok(Json(ChatReply { reply }))
}

/// GET /api/v1/coach/adjustments
async fn adjustments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DietAdjustment>> {
    let profile = require_profile(&state, &auth.email).await?;
    let log = DiaryService::today(state.db(), &auth.email).await?;
    Ok(Json(CoachService::diet_adjustments(state.ai(), &profile, &log.meals).await))
}
