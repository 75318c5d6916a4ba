//! Nutrition target derivation
//!
//! Pure functions turning a profile's biometrics into daily calorie and
//! protein targets, the per-meal split used for meal-plan prompts, and the
//! dashboard summary of a day's intake against those targets.
//!
//! Targets are recomputed whenever a profile is saved and stored only as part
//! of that profile. No physiological floor is applied to the calorie target.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, DailyLog, Gender, Goal, MacroNutrients, ProfileInput, UserProfile};

/// Daily calorie (kcal) and protein (g) targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionTargets {
    pub calories: i32,
    pub protein: i32,
}

impl ActivityLevel {
    /// TDEE multiplier; unrecognized levels use the sedentary value
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::Unrecognized(_) => 1.2,
        }
    }
}

impl Goal {
    /// Grams of protein per kg of body weight
    pub fn protein_multiplier(&self) -> f64 {
        match self {
            Goal::LoseWeight => 1.2,
            Goal::GainMuscle => 1.5,
            Goal::Maintain => 1.0,
        }
    }

    /// kcal added to (or removed from) TDEE
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            Goal::LoseWeight => -500.0,
            Goal::GainMuscle => 300.0,
            Goal::Maintain => 0.0,
        }
    }
}

/// Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + s,
/// where s = +5 for Male and -161 otherwise (Other shares the female offset).
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Other => base - 161.0,
    }
}

/// Total Daily Energy Expenditure before any goal adjustment
pub fn calculate_tdee(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender, activity: &ActivityLevel) -> f64 {
    calculate_bmr(weight_kg, height_cm, age_years, gender) * activity.multiplier()
}

/// Round to the nearest integer, ties toward positive infinity
///
/// `-75.5` becomes `-75`, matching the dashboard's arithmetic; `f64::round`
/// would give `-76`.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Derive daily targets from a profile's biometrics and goal
pub fn calculate_targets(input: &ProfileInput) -> NutritionTargets {
    let protein = round_half_up(input.weight * input.goal.protein_multiplier());

    let tdee = calculate_tdee(
        input.weight,
        input.height,
        input.age,
        input.gender,
        &input.activity_level,
    );
    let calories = round_half_up(tdee + input.goal.calorie_adjustment());

    NutritionTargets { calories, protein }
}

// ============================================================================
// Meal plan split
// ============================================================================

pub const BREAKFAST_SHARE: f64 = 0.30;
pub const LUNCH_SHARE: f64 = 0.35;
pub const DINNER_SHARE: f64 = 0.35;

/// Per-meal calorie and protein sub-target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealTarget {
    pub calories: i32,
    pub protein: i32,
}

/// Sub-targets handed to the meal planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanTargets {
    pub breakfast: MealTarget,
    pub lunch: MealTarget,
    pub dinner: MealTarget,
}

fn share_of(targets: &NutritionTargets, share: f64) -> MealTarget {
    MealTarget {
        calories: round_half_up(targets.calories as f64 * share),
        protein: round_half_up(targets.protein as f64 * share),
    }
}

/// Split daily targets 30/35/35 across breakfast, lunch and dinner
///
/// Each value is rounded on its own, so the parts may drift from the daily
/// total by a unit or two.
pub fn meal_plan_split(targets: &NutritionTargets) -> MealPlanTargets {
    MealPlanTargets {
        breakfast: share_of(targets, BREAKFAST_SHARE),
        lunch: share_of(targets, LUNCH_SHARE),
        dinner: share_of(targets, DINNER_SHARE),
    }
}

// ============================================================================
// Dashboard summary
// ============================================================================

/// Intake for one day measured against the profile's targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub consumed: MacroNutrients,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<NutritionTargets>,
    /// kcal left before hitting the target, never negative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_calories: Option<i32>,
    /// Share of the calorie target consumed, capped at 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_progress_percent: Option<f64>,
}

impl DailySummary {
    pub fn compute(log: &DailyLog, profile: Option<&UserProfile>) -> Self {
        let consumed = log.totals();
        let targets = profile.map(UserProfile::targets);

        let remaining_calories = targets.map(|t| {
            let remaining = t.calories as f64 - consumed.calories;
            round_half_up(remaining.max(0.0))
        });

        let calorie_progress_percent = targets.map(|t| {
            if t.calories <= 0 {
                0.0
            } else {
                (consumed.calories / t.calories as f64 * 100.0).min(100.0)
            }
        });

        Self {
            date: log.date,
            meal_count: log.meals.len(),
            consumed,
            targets,
            remaining_calories,
            calorie_progress_percent,
        }
    }
}
