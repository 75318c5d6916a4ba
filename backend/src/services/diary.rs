//! Daily log service
//!
//! Logs are stored whole; appending a meal is read-modify-write with
//! last-write-wins semantics for concurrent appends.

use crate::error::ApiError;
use crate::repositories::{LogRepository, UserRepository};
use befit_shared::models::{DailyLog, NewMeal};
use befit_shared::targets::DailySummary;
use befit_shared::validation::{validate_macros, validate_new_meal};
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;

pub struct DiaryService;

impl DiaryService {
    /// The log for a day, or an empty log when nothing was recorded
    pub async fn log_for(db: &PgPool, email: &str, date: NaiveDate) -> Result<DailyLog, ApiError> {
        let log = LogRepository::find(db, email, date)
            .await
            .map_err(ApiError::Internal)?;
        Ok(log.unwrap_or_else(|| DailyLog::empty(date)))
    }

    pub async fn today(db: &PgPool, email: &str) -> Result<DailyLog, ApiError> {
        Self::log_for(db, email, befit_shared::today()).await
    }

    /// Replace the stored log for `log.date`
    pub async fn save_log(db: &PgPool, email: &str, log: DailyLog) -> Result<DailyLog, ApiError> {
        for meal in &log.meals {
            validate_macros(&meal.macros)
                .map_err(|msg| ApiError::Validation(format!("{}: {}", meal.name, msg)))?;
        }
        if let Some(weight) = log.weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ApiError::Validation("Weight must be a positive number".to_string()));
            }
        }

        LogRepository::upsert(db, email, &log)
            .await
            .map_err(ApiError::Internal)?;
        debug!(email = %email, date = %log.date, meals = log.meals.len(), "Daily log saved");
        Ok(log)
    }

    /// Append a meal to today's log and return the updated log
    pub async fn append_meal(db: &PgPool, email: &str, meal: NewMeal) -> Result<DailyLog, ApiError> {
        validate_new_meal(&meal)?;

        let mut log = Self::today(db, email).await?;
        log.push_meal(meal.into_meal_log(Utc::now()));
        Self::save_log(db, email, log).await
    }

    /// Today's totals against the stored profile targets
    pub async fn summary(db: &PgPool, email: &str) -> Result<DailySummary, ApiError> {
        let log = Self::today(db, email).await?;
        let profile = UserRepository::get_profile(db, email)
            .await
            .map_err(ApiError::Internal)?;
        Ok(DailySummary::compute(&log, profile.as_ref()))
    }
}

/// Parse a `YYYY-MM-DD` path segment
pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}
