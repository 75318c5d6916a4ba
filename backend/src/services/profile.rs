//! Profile service
//!
//! Targets are recomputed from the submitted fields on every save.

use crate::error::ApiError;
use crate::repositories::UserRepository;
use befit_shared::models::{ProfileInput, UserProfile};
use befit_shared::validation::validate_profile_input;
use sqlx::PgPool;
use tracing::info;

pub struct ProfileService;

impl ProfileService {
    /// Stored profile, or `None` before onboarding
    pub async fn get_profile(db: &PgPool, email: &str) -> Result<Option<UserProfile>, ApiError> {
        UserRepository::get_profile(db, email)
            .await
            .map_err(ApiError::Internal)
    }

    /// Validate, derive targets, and replace the stored profile
    pub async fn save_profile(
        db: &PgPool,
        email: &str,
        input: ProfileInput,
    ) -> Result<UserProfile, ApiError> {
        let profile = Self::prepare(input)?;

        let saved = UserRepository::save_profile(db, email, &profile)
            .await
            .map_err(ApiError::Internal)?;
        if !saved {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(
            email = %email,
            target_calories = profile.target_calories,
            target_protein = profile.target_protein,
            "Profile saved"
        );
        Ok(profile)
    }

    /// Validation and derivation without storage
    pub fn prepare(input: ProfileInput) -> Result<UserProfile, ApiError> {
        validate_profile_input(&input)?;
        Ok(input.into_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use befit_shared::models::{ActivityLevel, Gender, Goal};

    #[test]
    fn test_prepare_derives_targets() {
        let input = ProfileInput {
            name: "James Smith".to_string(),
            age: 25,
            gender: Gender::Male,
            height: 170.0,
            weight: 70.0,
            goal: Goal::LoseWeight,
            activity_level: ActivityLevel::Sedentary,
            dietary_restrictions: "None".to_string(),
        };

        let profile = ProfileService::prepare(input).unwrap();
        assert_eq!(profile.target_calories, 1471);
        assert_eq!(profile.target_protein, 84);
    }

    #[test]
    fn test_prepare_rejects_invalid_fields() {
        let input = ProfileInput {
            name: "James".to_string(),
            weight: 5.0,
            ..Default::default()
        };
        match ProfileService::prepare(input) {
            Err(ApiError::InvalidField { field, message }) => {
                assert_eq!(field, "weight");
                assert!(message.starts_with("Current Weight"));
            }
            other => panic!("expected validation error, got {:?}", other.map(|p| p.name)),
        }
    }
}
