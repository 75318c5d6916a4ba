//! Gemini REST gateway (`models/{model}:generateContent`)

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{AiGateway, Content, GenerateRequest, GenerateResponse, ModelKind, Part};
use crate::config::AiConfig;

pub struct GeminiGateway {
    client: Client,
    api_base: String,
    api_key: SecretString,
    text_model: String,
    image_model: String,
}

impl GeminiGateway {
    pub fn new(config: &AiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(anyhow!("Gemini API key is required. Set BEFIT__AI__API_KEY."));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: Secret::new(config.api_key.clone()),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    fn model_name(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Text => &self.text_model,
            ModelKind::Image => &self.image_model,
        }
    }

    fn endpoint(&self, kind: ModelKind) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model_name(kind))
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = self.endpoint(request.model);
        let body = WireRequest::from(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let parsed = response
            .json::<WireResponse>()
            .await
            .context("Failed to parse Gemini API response")?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Gemini API returned no candidates"))?;

        let parts: Vec<Part> = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(WirePart::into_part)
            .collect();

        debug!(parts = parts.len(), finish_reason = ?candidate.finish_reason, "Gemini response received");
        Ok(GenerateResponse { parts })
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

impl From<GenerateRequest> for WireRequest {
    fn from(request: GenerateRequest) -> Self {
        Self {
            contents: request.contents.into_iter().map(WireContent::from).collect(),
            system_instruction: request.system_instruction.map(|text| WireContent {
                role: None,
                parts: vec![WirePart::text(text)],
            }),
            generation_config: request.response_schema.map(|schema| WireGenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<WirePart>,
}

impl From<Content> for WireContent {
    fn from(content: Content) -> Self {
        Self {
            role: Some(content.role.as_str().to_string()),
            parts: content.parts.into_iter().map(WirePart::from).collect(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireInlineData>,
}

impl WirePart {
    fn text(text: String) -> Self {
        Self { text: Some(text), inline_data: None }
    }

    fn into_part(self) -> Option<Part> {
        match (self.inline_data, self.text) {
            (Some(inline), _) => Some(Part::InlineData {
                mime_type: inline.mime_type,
                data: inline.data,
            }),
            (None, Some(text)) => Some(Part::Text(text)),
            (None, None) => None,
        }
    }
}

impl From<Part> for WirePart {
    fn from(part: Part) -> Self {
        match part {
            Part::Text(text) => WirePart::text(text),
            Part::InlineData { mime_type, data } => WirePart {
                text: None,
                inline_data: Some(WireInlineData { mime_type, data }),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireContent>,
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> GeminiGateway {
        let config = AiConfig {
            enabled: true,
            api_base: server.uri(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        GeminiGateway::new(&config).unwrap()
    }

    #[test]
    fn test_requires_api_key() {
        assert!(GeminiGateway::new(&AiConfig::default()).is_err());
    }

    #[test]
    fn test_wire_request_shape() {
        let request = GenerateRequest::text(vec![Content::user(vec![
            Part::InlineData { mime_type: "image/jpeg".to_string(), data: "abc".to_string() },
            Part::Text("Analyze this meal.".to_string()),
        ])])
        .with_system("Be brief")
        .with_schema(json!({"type": "OBJECT"}));

        let wire = serde_json::to_value(WireRequest::from(request)).unwrap();
        assert_eq!(
            wire,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"inlineData": {"mimeType": "image/jpeg", "data": "abc"}},
                        {"text": "Analyze this meal."}
                    ]
                }],
                "systemInstruction": {"parts": [{"text": "Be brief"}]},
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_generate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hi there!"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = gateway_for(&server)
            .generate(GenerateRequest::text(vec![Content::user_text("hello")]))
            .await
            .unwrap();

        assert_eq!(response.text().as_deref(), Some("Hi there!"));
    }

    #[tokio::test]
    async fn test_generate_image_uses_image_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash-image:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [
                        {"text": "Here is your photo"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]}
                }]
            })))
            .mount(&server)
            .await;

        let response = gateway_for(&server)
            .generate(GenerateRequest::image("Grilled salmon"))
            .await
            .unwrap();

        assert_eq!(
            response.first_image_data_url().as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = gateway_for(&server)
            .generate(GenerateRequest::text(vec![Content::user_text("hello")]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})))
            .mount(&server)
            .await;

        let result = gateway_for(&server)
            .generate(GenerateRequest::text(vec![Content::user_text("hello")]))
            .await;

        assert!(result.is_err());
    }
}
