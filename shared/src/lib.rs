//! BeFit Shared Library
//!
//! Domain types, nutrition-target derivation, API types, and validation
//! shared by the backend, the client storage layer, and the WASM module.

pub mod models;
pub mod targets;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use models::{
    today, ActivityLevel, DailyLog, Gender, Goal, MacroNutrients, MealLog, MealType, NewMeal,
    ProfileInput, UserProfile,
};
pub use targets::{calculate_targets, meal_plan_split, DailySummary, MealPlanTargets, NutritionTargets};
pub use types::*;
