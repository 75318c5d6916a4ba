//! Health endpoints
//!
//! `/health` and `/health/live` answer as long as the process serves
//! requests. `/health/ready` also pings the database and reports whether the
//! AI coach is configured; only the database decides readiness.

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<ReadinessChecks>,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            service: "befit-backend",
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub database: Check,
    pub ai: Check,
}

#[derive(Debug, Serialize)]
pub struct Check {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Check {
    fn ok() -> Self {
        Self { status: "healthy", detail: None }
    }

    fn failed(detail: String) -> Self {
        Self {
            status: "unhealthy",
            detail: Some(detail),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// GET /health/live
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive"))
}

/// GET /health/ready, 503 when the database is unreachable
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = db::health_check(state.db())
        .await
        .map_or_else(|e| Check::failed(e.to_string()), |_| Check::ok());

    let ai = Check {
        status: if state.ai().is_enabled() { "enabled" } else { "disabled" },
        detail: None,
    };

    let ready = database.is_ok();
    let mut response = HealthResponse::new(if ready { "ready" } else { "not_ready" });
    response.checks = Some(ReadinessChecks { database, ai });

    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(response))
}
