//! Domain models for the BeFit diet tracker
//!
//! The JSON shape of these types is the storage format: profiles and daily
//! logs are persisted as opaque structured blobs, both by the backend and by
//! the client-side local store, so field names are camelCase throughout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use uuid::Uuid;

use crate::targets::{calculate_targets, NutritionTargets};

// ============================================================================
// Profile enums
// ============================================================================

/// Gender as entered during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Gender {
    #[default]
    #[serde(alias = "male")]
    Male,
    #[serde(alias = "female")]
    Female,
    #[serde(alias = "other")]
    Other,
}

/// Weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Goal {
    #[default]
    #[serde(rename = "Lose Weight", alias = "lose_weight")]
    LoseWeight,
    #[serde(alias = "maintain")]
    Maintain,
    #[serde(rename = "Gain Muscle", alias = "gain_muscle")]
    GainMuscle,
}

impl Goal {
    pub fn label(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "Lose Weight",
            Goal::Maintain => "Maintain",
            Goal::GainMuscle => "Gain Muscle",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Activity level used for the TDEE multiplier
///
/// Levels outside the known set are kept verbatim in `Unrecognized` rather
/// than rejected; they derive targets with the sedentary multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    Unrecognized(String),
}

impl ActivityLevel {
    pub fn label(&self) -> &str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for ActivityLevel {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().replace('_', " ").as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "lightly active" => ActivityLevel::LightlyActive,
            "moderately active" => ActivityLevel::ModeratelyActive,
            "very active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Unrecognized(raw),
        }
    }
}

impl From<ActivityLevel> for String {
    fn from(level: ActivityLevel) -> Self {
        match level {
            ActivityLevel::Unrecognized(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Profile
// ============================================================================

/// A user's biometric and goal profile, one per account
///
/// `target_calories` and `target_protein` are derived; build profiles through
/// [`ProfileInput::into_profile`] so they are always recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    pub target_calories: i32,
    pub target_protein: i32,
    #[serde(default)]
    pub dietary_restrictions: String,
}

impl UserProfile {
    pub fn targets(&self) -> NutritionTargets {
        NutritionTargets {
            calories: self.target_calories,
            protein: self.target_protein,
        }
    }
}

/// Profile fields the user actually edits
///
/// Every biometric must be present; only `dietaryRestrictions` may be
/// omitted. Any `targetCalories` / `targetProtein` sent alongside are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub dietary_restrictions: String,
}

impl Default for ProfileInput {
    /// Onboarding form defaults
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 25,
            gender: Gender::Male,
            height: 170.0,
            weight: 70.0,
            goal: Goal::LoseWeight,
            activity_level: ActivityLevel::Sedentary,
            dietary_restrictions: "None".to_string(),
        }
    }
}

impl ProfileInput {
    /// Build the stored profile, deriving nutrition targets
    pub fn into_profile(self) -> UserProfile {
        let targets = calculate_targets(&self);
        UserProfile {
            name: self.name,
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            goal: self.goal,
            activity_level: self.activity_level,
            target_calories: targets.calories,
            target_protein: targets.protein,
            dietary_restrictions: self.dietary_restrictions,
        }
    }
}

impl From<UserProfile> for ProfileInput {
    fn from(p: UserProfile) -> Self {
        Self {
            name: p.name,
            age: p.age,
            gender: p.gender,
            height: p.height,
            weight: p.weight,
            goal: p.goal,
            activity_level: p.activity_level,
            dietary_restrictions: p.dietary_restrictions,
        }
    }
}

// ============================================================================
// Meals and daily logs
// ============================================================================

/// Calories (kcal) and macro grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MacroNutrients {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

impl MacroNutrients {
    /// Replace negative or non-finite estimates with zero
    pub fn sanitized(self) -> Self {
        fn clean(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            calories: clean(self.calories),
            protein: clean(self.protein),
            carbs: clean(self.carbs),
            fat: clean(self.fat),
        }
    }
}

impl Add for MacroNutrients {
    type Output = MacroNutrients;

    fn add(self, rhs: Self) -> Self::Output {
        MacroNutrients {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for MacroNutrients {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MealType {
    #[serde(alias = "breakfast")]
    Breakfast,
    #[serde(alias = "lunch")]
    Lunch,
    #[serde(alias = "dinner")]
    Dinner,
    #[default]
    #[serde(alias = "snack")]
    Snack,
}

/// One logged meal; immutable once saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLog {
    pub id: String,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub macros: MacroNutrients,
    /// Base64 snapshot or data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "type", default)]
    pub meal_type: MealType,
}

/// A meal as submitted by the quick-log or meal-planner flow, before it is
/// given an identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub name: String,
    pub macros: MacroNutrients,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "type", default)]
    pub meal_type: MealType,
}

impl NewMeal {
    pub fn into_meal_log(self, now: DateTime<Utc>) -> MealLog {
        MealLog {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            timestamp: now,
            macros: self.macros,
            image: self.image,
            notes: self.notes,
            meal_type: self.meal_type,
        }
    }
}

/// All meals logged by one account on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub meals: Vec<MealLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl DailyLog {
    /// The default log for a date with nothing recorded yet
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            meals: Vec::new(),
            weight: None,
        }
    }

    /// Append in logging order
    pub fn push_meal(&mut self, meal: MealLog) {
        self.meals.push(meal);
    }

    pub fn totals(&self) -> MacroNutrients {
        self.meals
            .iter()
            .fold(MacroNutrients::default(), |acc, m| acc + m.macros)
    }
}

/// Today's date in UTC, the key used for "today's log"
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
