//! Prompts and response schemas for the coach features

use befit_shared::models::{MealLog, UserProfile};
use befit_shared::targets::meal_plan_split;
use serde_json::{json, Value};

pub const COACH_PERSONA: &str =
    "You are a helpful, encouraging diet coach named FitBot. Keep answers concise.";

pub const ANALYZE_IMAGE_PROMPT: &str = "Analyze this meal. Estimate its name and macros.";

pub fn analyze_description_prompt(description: &str) -> String {
    format!("Analyze this meal description: \"{}\". Estimate its name and macros.", description.trim())
}

pub fn meal_analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "macros": {
                "type": "OBJECT",
                "properties": {
                    "calories": { "type": "NUMBER" },
                    "protein": { "type": "NUMBER" },
                    "carbs": { "type": "NUMBER" },
                    "fat": { "type": "NUMBER" }
                }
            },
            "advice": { "type": "STRING" }
        }
    })
}

fn recipe_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "description": { "type": "STRING" },
            "calories": { "type": "NUMBER" },
            "protein": { "type": "NUMBER" },
            "carbs": { "type": "NUMBER" },
            "fat": { "type": "NUMBER" },
            "ingredients": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of ingredients with quantities"
            },
            "instructions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Step by step cooking instructions"
            }
        }
    })
}

pub fn meal_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "breakfast": { "type": "ARRAY", "items": recipe_schema() },
            "lunch": { "type": "ARRAY", "items": recipe_schema() },
            "dinner": { "type": "ARRAY", "items": recipe_schema() }
        }
    })
}

/// Meal plan prompt carrying the per-meal calorie and protein split
pub fn meal_plan_prompt(profile: &UserProfile) -> String {
    let split = meal_plan_split(&profile.targets());
    format!(
        "Create a daily meal plan with 3 distinct options for each meal time (Breakfast, Lunch, Dinner) for:\n\
         Height: {height}cm, Weight: {weight}kg, Goal: {goal}.\n\
         Daily Total Targets: {calories} Calories, {protein}g Protein.\n\
         Dietary Restrictions: {restrictions}.\n\n\
         Keep each option close to its per-meal target so the day adds up to the daily goal:\n\
         - Breakfast Options: Approx {b_cal} kcal and {b_pro}g protein.\n\
         - Lunch Options: Approx {l_cal} kcal and {l_pro}g protein.\n\
         - Dinner Options: Approx {d_cal} kcal and {d_pro}g protein.\n\n\
         Do not exceed these per-meal values significantly.\n\
         For each meal time provide 3 different healthy recipe options with ingredients and instructions.\n\
         Return JSON.",
        height = profile.height,
        weight = profile.weight,
        goal = profile.goal,
        calories = profile.target_calories,
        protein = profile.target_protein,
        restrictions = profile.dietary_restrictions,
        b_cal = split.breakfast.calories,
        b_pro = split.breakfast.protein,
        l_cal = split.lunch.calories,
        l_pro = split.lunch.protein,
        d_cal = split.dinner.calories,
        d_pro = split.dinner.protein,
    )
}

pub fn meal_image_prompt(meal_name: &str) -> String {
    format!(
        "A delicious, professional high-resolution food photography shot of {}. \
         Appetizing, restaurant quality, cinematic lighting.",
        meal_name.trim()
    )
}

pub fn adjustments_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "missingMacros": { "type": "STRING" },
            "suggestion": { "type": "STRING" }
        }
    })
}

pub fn adjustments_prompt(profile: &UserProfile, meals: &[MealLog]) -> String {
    let eaten: Vec<Value> = meals
        .iter()
        .map(|m| json!({ "name": m.name, "macros": m.macros }))
        .collect();

    format!(
        "User: {name}, Goal: {goal}, Target Cal: {calories}, Target Protein: {protein}g.\n\
         Today's Meals: {meals}.\n\n\
         Provide a JSON response with:\n\
         1. missingMacros: which macro (Protein, Carbs, or Fat) they need more of in the next meal.\n\
         2. suggestion: a specific food suggestion to hit that macro.",
        name = profile.name,
        goal = profile.goal,
        calories = profile.target_calories,
        protein = profile.target_protein,
        meals = Value::Array(eaten),
    )
}

/// Strip a markdown code fence some models wrap JSON answers in
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use befit_shared::models::ProfileInput;

    fn profile() -> UserProfile {
        ProfileInput {
            name: "Mary Jones".to_string(),
            weight: 80.0,
            height: 165.0,
            age: 40,
            ..Default::default()
        }
        .into_profile()
    }

    #[test]
    fn test_meal_plan_prompt_carries_split() {
        let profile = profile();
        let split = meal_plan_split(&profile.targets());
        let prompt = meal_plan_prompt(&profile);

        assert!(prompt.contains(&format!("{} Calories", profile.target_calories)));
        assert!(prompt.contains(&format!("Approx {} kcal and {}g protein", split.breakfast.calories, split.breakfast.protein)));
        assert!(prompt.contains(&format!("Approx {} kcal and {}g protein", split.dinner.calories, split.dinner.protein)));
        assert!(prompt.contains("Goal: Lose Weight"));
        assert!(prompt.contains("Dietary Restrictions: None"));
    }

    #[test]
    fn test_adjustments_prompt_lists_meals() {
        let prompt = adjustments_prompt(&profile(), &[]);
        assert!(prompt.contains("Today's Meals: []"));
        assert!(prompt.contains("User: Mary Jones"));
    }

    #[test]
    fn test_schemas_are_objects() {
        assert_eq!(meal_analysis_schema()["type"], "OBJECT");
        assert_eq!(meal_plan_schema()["properties"]["lunch"]["type"], "ARRAY");
        assert_eq!(adjustments_schema()["properties"]["missingMacros"]["type"], "STRING");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[]\n```"), "[]");
    }
}
