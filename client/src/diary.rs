//! Diary flows built on any `DietStore`

use befit_shared::models::{today, DailyLog, NewMeal, ProfileInput, UserProfile};
use befit_shared::targets::DailySummary;
use befit_shared::validation::{validate_new_meal, validate_profile_input, validate_weight_kg};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::session::Session;
use crate::store::DietStore;

pub struct Diary<S> {
    store: S,
}

impl<S: DietStore> Diary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn profile(&self, session: &Session) -> StoreResult<Option<UserProfile>> {
        self.store.load_profile(session).await
    }

    /// Validate, derive targets, and replace the stored profile
    pub async fn save_profile(&self, session: &Session, input: ProfileInput) -> StoreResult<UserProfile> {
        validate_profile_input(&input).map_err(|e| StoreError::Validation(e.user_message()))?;

        let profile = input.into_profile();
        self.store.save_profile(session, &profile).await?;
        Ok(profile)
    }

    pub async fn log_for(&self, session: &Session, date: NaiveDate) -> StoreResult<DailyLog> {
        self.store.load_daily_log(session, date).await
    }

    pub async fn today(&self, session: &Session) -> StoreResult<DailyLog> {
        self.log_for(session, today()).await
    }

    /// Append one meal to today's log
    ///
    /// Read-modify-write: two overlapping appends for the same day race and
    /// the later write wins.
    pub async fn append_meal(&self, session: &Session, meal: NewMeal) -> StoreResult<DailyLog> {
        validate_new_meal(&meal).map_err(|e| StoreError::Validation(e.user_message()))?;

        let mut log = self.today(session).await?;
        log.push_meal(meal.into_meal_log(Utc::now()));
        self.store.save_daily_log(session, &log).await?;

        debug!(email = %session.email, meals = log.meals.len(), "meal appended");
        Ok(log)
    }

    /// Set today's weight, keeping the logged meals
    pub async fn record_weight(&self, session: &Session, weight_kg: f64) -> StoreResult<DailyLog> {
        validate_weight_kg(weight_kg).map_err(StoreError::Validation)?;

        let mut log = self.today(session).await?;
        log.weight = Some(weight_kg);
        self.store.save_daily_log(session, &log).await?;
        Ok(log)
    }

    /// Today's intake against the profile's targets
    pub async fn summary(&self, session: &Session) -> StoreResult<DailySummary> {
        let log = self.today(session).await?;
        let profile = self.profile(session).await?;
        Ok(DailySummary::compute(&log, profile.as_ref()))
    }
}
