//! BeFit WASM Module
//!
//! Browser bindings for target derivation and the meal-plan split, so the
//! onboarding form and dashboard show the same numbers the backend stores.
//! Structured values cross the boundary as JSON strings in the shared
//! camelCase shape.

use befit_shared::models::{ActivityLevel, DailyLog, Gender, Goal, ProfileInput, UserProfile};
use befit_shared::targets::{self, DailySummary, NutritionTargets};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Daily targets as seen from JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub calories: i32,
    pub protein: i32,
}

impl From<NutritionTargets> for Targets {
    fn from(t: NutritionTargets) -> Self {
        Self {
            calories: t.calories,
            protein: t.protein,
        }
    }
}

fn parse_label<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("unknown {field}: {raw}"))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn from_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid {what}: {e}"))
}

fn derive(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    gender: &str,
    activity_level: &str,
    goal: &str,
) -> Result<Targets, String> {
    let input = ProfileInput {
        age: age_years,
        gender: parse_label::<Gender>("gender", gender)?,
        height: height_cm,
        weight: weight_kg,
        goal: parse_label::<Goal>("goal", goal)?,
        activity_level: ActivityLevel::from(activity_level.to_string()),
        ..Default::default()
    };
    Ok(targets::calculate_targets(&input).into())
}

fn split_json(calories: i32, protein: i32) -> Result<String, String> {
    to_json(&targets::meal_plan_split(&NutritionTargets { calories, protein }))
}

fn profile_json(input_json: &str) -> Result<String, String> {
    let input: ProfileInput = from_json("profile", input_json)?;
    to_json(&input.into_profile())
}

fn summary_json(log_json: &str, profile_json: Option<String>) -> Result<String, String> {
    let log: DailyLog = from_json("daily log", log_json)?;
    let profile = profile_json
        .map(|json| from_json::<UserProfile>("profile", &json))
        .transpose()?;
    to_json(&DailySummary::compute(&log, profile.as_ref()))
}

/// Derive daily calorie and protein targets
///
/// `gender`, `goal` and `activity_level` take the display labels
/// ("Female", "Gain Muscle", "Very Active"). Unknown activity levels use the
/// sedentary multiplier.
#[wasm_bindgen(js_name = calculateTargets)]
pub fn calculate_targets(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    gender: &str,
    activity_level: &str,
    goal: &str,
) -> Result<Targets, JsError> {
    derive(weight_kg, height_cm, age_years, gender, activity_level, goal).map_err(|e| JsError::new(&e))
}

/// Breakfast/lunch/dinner sub-targets as JSON
#[wasm_bindgen(js_name = mealPlanSplit)]
pub fn meal_plan_split(calories: i32, protein: i32) -> Result<String, JsError> {
    split_json(calories, protein).map_err(|e| JsError::new(&e))
}

/// Turn onboarding form JSON into the stored profile JSON, targets included
#[wasm_bindgen(js_name = buildProfile)]
pub fn build_profile(input_json: &str) -> Result<String, JsError> {
    profile_json(input_json).map_err(|e| JsError::new(&e))
}

/// Dashboard summary for a day's log, optionally against a profile
#[wasm_bindgen(js_name = dailySummary)]
pub fn daily_summary(log_json: &str, profile_json: Option<String>) -> Result<String, JsError> {
    summary_json(log_json, profile_json).map_err(|e| JsError::new(&e))
}
