//! API error type
//!
//! Every handler returns `ApiResult`; errors render as
//! `{"error": {"code", "message", "field"?}}` with a matching status.
//! Internal and database failures are logged and replaced by a generic
//! message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use befit_shared::validation::ValidationError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation failure tied to one input field
    #[error("Validation error on {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Duplicate account
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The generative model failed and the operation has no neutral fallback
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidField {
            message: err.user_message(),
            field: err.field,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidField { .. } | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::InvalidField { .. } => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let (message, field) = match self {
            ApiError::InvalidField { field, message } => (message, Some(field)),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("An internal error occurred".to_string(), None)
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                ("A database error occurred".to_string(), None)
            }
            ApiError::Validation(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Upstream(msg) => (msg, None),
        };

        let body = ErrorResponse {
            error: ErrorDetail { code, message, field },
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::BadRequest("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(ApiError::Unauthorized("Invalid credentials".into()), StatusCode::UNAUTHORIZED)]
    #[case(ApiError::NotFound("Profile not found".into()), StatusCode::NOT_FOUND)]
    #[case(ApiError::Conflict("User already exists".into()), StatusCode::CONFLICT)]
    #[case(ApiError::Upstream("Analysis failed".into()), StatusCode::BAD_GATEWAY)]
    fn test_status_mapping(#[case] err: ApiError, #[case] expected: StatusCode) {
        assert_eq!(err.into_response().status(), expected);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, json) = body_of(ApiError::Conflict("User already exists".to_string())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "CONFLICT");
        assert_eq!(json["error"]["message"], "User already exists");
        assert!(json["error"].get("field").is_none());
    }

    #[tokio::test]
    async fn test_field_validation_names_the_field() {
        let err = ApiError::from(ValidationError::new("age", "Age must be at least 1 year"));
        let (status, json) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["field"], "age");
        assert_eq!(json["error"]["message"], "Age: Age must be at least 1 year");
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, json) = body_of(ApiError::Internal(anyhow::anyhow!("pool exhausted"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}
