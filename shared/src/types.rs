//! API request and response types

use serde::{Deserialize, Serialize};

use crate::models::MacroNutrients;

// ============================================================================
// Accounts
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued session: a signed bearer token naming the account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub email: String,
    pub name: String,
}

/// Current account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub email: String,
    pub name: String,
    pub has_profile: bool,
}

// ============================================================================
// Coach: meal analysis
// ============================================================================

/// Quick-log analysis request; exactly one of the two inputs is expected
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeMealRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw base64 photo, without a data URL prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Estimated name and macros for a described or photographed meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAnalysis {
    pub name: String,
    pub macros: MacroNutrients,
    #[serde(default)]
    pub advice: String,
}

// ============================================================================
// Coach: meal plans and images
// ============================================================================

/// One generated recipe option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RecipeSuggestion {
    pub name: String,
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Ingredients with quantities
    pub ingredients: Vec<String>,
    /// Step by step cooking instructions
    pub instructions: Vec<String>,
}

impl RecipeSuggestion {
    pub fn macros(&self) -> MacroNutrients {
        MacroNutrients {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

/// Three-slot daily plan; empty when generation failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MealPlan {
    pub breakfast: Vec<RecipeSuggestion>,
    pub lunch: Vec<RecipeSuggestion>,
    pub dinner: Vec<RecipeSuggestion>,
}

impl MealPlan {
    pub fn is_empty(&self) -> bool {
        self.breakfast.is_empty() && self.lunch.is_empty() && self.dinner.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealImageRequest {
    pub meal_name: String,
}

/// Generated photo as a data URL, or none
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealImageResponse {
    pub image: Option<String>,
}

// ============================================================================
// Coach: chat and adjustments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Next-meal nudge based on what has been eaten today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietAdjustment {
    pub missing_macros: String,
    pub suggestion: String,
}

impl Default for DietAdjustment {
    fn default() -> Self {
        Self {
            missing_macros: "Nutrients".to_string(),
            suggestion: "Balanced meal".to_string(),
        }
    }
}
