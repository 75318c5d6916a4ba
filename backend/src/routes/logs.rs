//! Daily log routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::diary::{parse_date, DiaryService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use befit_shared::models::{DailyLog, NewMeal};
use befit_shared::targets::DailySummary;

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/", put(save_log))
        .route("/today", get(today))
        .route("/today/meals", post(append_meal))
        .route("/today/summary", get(summary))
        .route("/:date", get(log_for_date))
}

/// GET /api/v1/logs/today
async fn today(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<DailyLog>> {
    let log = DiaryService::today(state.db(), &auth.email).await?;
    Ok(Json(log))
}

/// GET /api/v1/logs/:date
async fn log_for_date(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<String>,
) -> ApiResult<Json<DailyLog>> {
    let date = parse_date(&date)?;
    let log = DiaryService::log_for(state.db(), &auth.email, date).await?;
    Ok(Json(log))
}

/// PUT /api/v1/logs - full replace of the log for `date`
async fn save_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(log): Json<DailyLog>,
) -> ApiResult<Json<DailyLog>> {
    let log = DiaryService::save_log(state.db(), &auth.email, log).await?;
    Ok(Json(log))
}

/// POST /api/v1/logs/today/meals
async fn append_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(meal): Json<NewMeal>,
) -> ApiResult<Json<DailyLog>> {
    let log = DiaryService::append_meal(state.db(), &auth.email, meal).await?;
    Ok(Json(log))
}

/// GET /api/v1/logs/today/summary
async fn summary(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<DailySummary>> {
    let summary = DiaryService::summary(state.db(), &auth.email).await?;
    Ok(Json(summary))
}
