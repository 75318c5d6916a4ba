//! Input validation functions
//!
//! Field validators used by the backend services and the local store.
//! Derived values (targets) are never validated or clamped here.

use validator::ValidateEmail;

use crate::models::{MacroNutrients, NewMeal, ProfileInput};

/// Normalize an email for use as an account key
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
///
/// The single email check for every account path, remote and local.
/// Beyond RFC syntax the domain must contain a dot.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'));
    if !email.validate_email() || !dotted_domain {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.len() > 100 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

/// Validate age in whole years
pub fn validate_age(age: u32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate a macro breakdown: every value finite and non-negative
pub fn validate_macros(macros: &MacroNutrients) -> Result<(), String> {
    let values = [
        ("Calories", macros.calories),
        ("Protein", macros.protein),
        ("Carbs", macros.carbs),
        ("Fat", macros.fat),
    ];
    for (label, value) in values {
        if !value.is_finite() {
            return Err(format!("{} must be a valid number", label));
        }
        if value < 0.0 {
            return Err(format!("{} cannot be negative", label));
        }
    }
    if macros.calories > 50000.0 {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Name",
        "email" => "Email",
        "password" => "Password",
        "age" => "Age",
        "height" => "Height",
        "weight" => "Current Weight",
        "activityLevel" => "Activity Level",
        "dietaryRestrictions" => "Dietary Restrictions",
        "macros" => "Macros",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

fn check(field: &str, result: Result<(), String>) -> Result<(), ValidationError> {
    result.map_err(|msg| ValidationError::new(field, &msg))
}

/// Validate the editable profile fields
pub fn validate_profile_input(input: &ProfileInput) -> Result<(), ValidationError> {
    check("name", validate_name(&input.name))?;
    check("age", validate_age(input.age))?;
    check("height", validate_height_cm(input.height))?;
    check("weight", validate_weight_kg(input.weight))?;
    if input.dietary_restrictions.len() > 500 {
        return Err(ValidationError::new("dietaryRestrictions", "Too long"));
    }
    Ok(())
}

/// Validate a meal before it is appended to a log
pub fn validate_new_meal(meal: &NewMeal) -> Result<(), ValidationError> {
    check("name", validate_name(&meal.name))?;
    check("macros", validate_macros(&meal.macros))
}
