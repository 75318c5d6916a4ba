//! Coach service: prompts the generative model and applies fallbacks
//!
//! Every feature except meal analysis degrades to a neutral value when the
//! model fails. Analysis has no sensible default and surfaces a 502.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use befit_shared::models::{MacroNutrients, MealLog, UserProfile};
use befit_shared::types::{
    AnalyzeMealRequest, ChatMessage, ChatRole, DietAdjustment, MealAnalysis, MealPlan,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::ai::prompts;
use crate::ai::{AiGateway, Content, GenerateRequest, Part};
use crate::error::ApiError;

pub const ANALYSIS_FAILED: &str = "Analysis failed, please try again";
pub const CHAT_UNREACHABLE: &str = "I'm having trouble connecting right now.";
pub const CHAT_EMPTY: &str = "I'm having trouble thinking right now.";

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";
const MAX_CHAT_HISTORY: usize = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalysisAnswer {
    name: Option<String>,
    macros: Option<MacroNutrients>,
    advice: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AdjustmentAnswer {
    missing_macros: Option<String>,
    suggestion: Option<String>,
}

pub struct CoachService;

impl CoachService {
    /// Estimate name and macros from a description or a photo
    pub async fn analyze_meal(
        ai: &dyn AiGateway,
        request: AnalyzeMealRequest,
    ) -> Result<MealAnalysis, ApiError> {
        let parts = Self::analysis_parts(request)?;
        let generate = GenerateRequest::text(vec![Content::user(parts)])
            .with_schema(prompts::meal_analysis_schema());

        let answer: AnalysisAnswer = Self::generate_json(ai, generate).await.map_err(|e| {
            warn!("Meal analysis failed: {:#}", e);
            ApiError::Upstream(ANALYSIS_FAILED.to_string())
        })?;

        let name = answer
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                warn!("Meal analysis returned no meal name");
                ApiError::Upstream(ANALYSIS_FAILED.to_string())
            })?;

        Ok(MealAnalysis {
            name,
            macros: answer.macros.unwrap_or_default().sanitized(),
            advice: answer.advice.unwrap_or_default(),
        })
    }

    /// Build the model input for an analysis request
    fn analysis_parts(request: AnalyzeMealRequest) -> Result<Vec<Part>, ApiError> {
        let description = request.description.filter(|d| !d.trim().is_empty());
        let image = request.image_base64.filter(|i| !i.trim().is_empty());

        match (description, image) {
            (Some(_), Some(_)) => Err(ApiError::Validation(
                "Provide either a description or an image, not both".to_string(),
            )),
            (None, None) => Err(ApiError::Validation(
                "A meal description or image is required".to_string(),
            )),
            (Some(description), None) => Ok(vec![Part::Text(prompts::analyze_description_prompt(
                &description,
            ))]),
            (None, Some(image)) => {
                let (mime_type, data) = split_data_url(&image, request.mime_type.as_deref());
                if STANDARD.decode(data.as_bytes()).is_err() {
                    return Err(ApiError::BadRequest("Image is not valid base64".to_string()));
                }
                Ok(vec![
                    Part::InlineData { mime_type, data },
                    Part::Text(prompts::ANALYZE_IMAGE_PROMPT.to_string()),
                ])
            }
        }
    }

    /// Three recipe options per meal slot; empty on failure
    pub async fn meal_plan(ai: &dyn AiGateway, profile: &UserProfile) -> MealPlan {
        let request = GenerateRequest::text(vec![Content::user_text(prompts::meal_plan_prompt(profile))])
            .with_schema(prompts::meal_plan_schema());

        match Self::generate_json::<MealPlan>(ai, request).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Meal plan generation failed: {:#}", e);
                MealPlan::default()
            }
        }
    }

    /// Generated photo of a meal as a data URL, if any
    pub async fn meal_image(ai: &dyn AiGateway, meal_name: &str) -> Result<Option<String>, ApiError> {
        if meal_name.trim().is_empty() {
            return Err(ApiError::Validation("Meal name is required".to_string()));
        }

        match ai.generate(GenerateRequest::image(prompts::meal_image_prompt(meal_name))).await {
            Ok(response) => Ok(response.first_image_data_url()),
            Err(e) => {
                warn!("Meal image generation failed: {:#}", e);
                Ok(None)
            }
        }
    }

    /// Reply from the coach persona given the conversation so far
    pub async fn chat(
        ai: &dyn AiGateway,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, ApiError> {
        if message.trim().is_empty() {
            return Err(ApiError::Validation("Message cannot be empty".to_string()));
        }

        let skip = history.len().saturating_sub(MAX_CHAT_HISTORY);
        let mut contents: Vec<Content> = history
            .iter()
            .skip(skip)
            .map(|m| match m.role {
                ChatRole::User => Content::user_text(m.text.clone()),
                ChatRole::Model => Content::model_text(m.text.clone()),
            })
            .collect();
        contents.push(Content::user_text(message));

        let request = GenerateRequest::text(contents).with_system(prompts::COACH_PERSONA);
        let reply = match ai.generate(request).await {
            Ok(response) => response.text().unwrap_or_else(|| CHAT_EMPTY.to_string()),
            Err(e) => {
                warn!("Coach chat failed: {:#}", e);
                CHAT_UNREACHABLE.to_string()
            }
        };
        Ok(reply)
    }

    /// Which macro to prioritise next, given today's meals
    pub async fn diet_adjustments(
        ai: &dyn AiGateway,
        profile: &UserProfile,
        meals: &[MealLog],
    ) -> DietAdjustment {
        let request = GenerateRequest::text(vec![Content::user_text(prompts::adjustments_prompt(profile, meals))])
            .with_schema(prompts::adjustments_schema());

        let fallback = DietAdjustment::default();
        match Self::generate_json::<AdjustmentAnswer>(ai, request).await {
            Ok(answer) => DietAdjustment {
                missing_macros: answer
                    .missing_macros
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(fallback.missing_macros),
                suggestion: answer
                    .suggestion
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(fallback.suggestion),
            },
            Err(e) => {
                warn!("Diet adjustment request failed: {:#}", e);
                fallback
            }
        }
    }

    async fn generate_json<T: DeserializeOwned>(
        ai: &dyn AiGateway,
        request: GenerateRequest,
    ) -> anyhow::Result<T> {
        let response = ai.generate(request).await?;
        let text = response
            .text()
            .ok_or_else(|| anyhow::anyhow!("model returned no text"))?;
        let parsed = serde_json::from_str(prompts::strip_code_fence(&text))?;
        Ok(parsed)
    }
}

/// Split an optional `data:<mime>;base64,` prefix off an image payload
fn split_data_url(raw: &str, mime_hint: Option<&str>) -> (String, String) {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix("data:") {
        if let Some((mime, data)) = rest.split_once(";base64,") {
            return (mime.to_string(), data.to_string());
        }
    }
    let mime = mime_hint
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME);
    (mime.to_string(), raw.to_string())
}
