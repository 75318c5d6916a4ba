//! Generative model gateway
//!
//! Provider-neutral request/response types and the `AiGateway` trait the
//! coach service calls. `GeminiGateway` talks to the hosted model;
//! `UnavailableGateway` stands in when AI is disabled.

mod gemini;
pub mod prompts;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::AiConfig;

pub use gemini::GeminiGateway;

/// Which configured model a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Text,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    /// Base64 payload with its MIME type
    InlineData { mime_type: String, data: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self { role: Role::User, parts }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![Part::Text(text.into())])
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::Text(text.into())],
        }
    }
}

/// A single generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub model: ModelKind,
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    /// When set, the model must answer with JSON matching this schema
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn text(contents: Vec<Content>) -> Self {
        Self {
            model: ModelKind::Text,
            system_instruction: None,
            contents,
            response_schema: None,
        }
    }

    pub fn image(prompt: impl Into<String>) -> Self {
        Self {
            model: ModelKind::Image,
            system_instruction: None,
            contents: vec![Content::user_text(prompt)],
            response_schema: None,
        }
    }

    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Parts of the first candidate answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    /// Concatenated text parts, `None` when there is no non-blank text
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::InlineData { .. } => None,
            })
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image as a `data:` URL
    pub fn first_image_data_url(&self) -> Option<String> {
        self.parts.iter().find_map(|p| match p {
            Part::InlineData { mime_type, data } => {
                Some(format!("data:{};base64,{}", mime_type, data))
            }
            Part::Text(_) => None,
        })
    }
}

#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Whether calls can succeed at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Gateway used when no model is configured; every call fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableGateway;

#[async_trait]
impl AiGateway for UnavailableGateway {
    async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
        Err(anyhow::anyhow!("AI gateway is not configured"))
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Build the gateway described by the configuration
pub fn build_gateway(config: &AiConfig) -> Arc<dyn AiGateway> {
    if !config.is_usable() {
        info!("AI features disabled; coach endpoints will return fallbacks");
        return Arc::new(UnavailableGateway);
    }

    match GeminiGateway::new(config) {
        Ok(gateway) => {
            info!(text_model = %config.text_model, image_model = %config.image_model, "AI gateway ready");
            Arc::new(gateway)
        }
        Err(e) => {
            warn!("Failed to build AI gateway: {}. Coach endpoints will return fallbacks.", e);
            Arc::new(UnavailableGateway)
        }
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Scripted gateway for service and route tests

    use super::*;
    use std::sync::Mutex;

    pub(crate) struct StubGateway {
        replies: Mutex<Vec<Result<GenerateResponse>>>,
        pub(crate) requests: Mutex<Vec<GenerateRequest>>,
    }

    impl StubGateway {
        /// Replies are handed out in order; once exhausted every call fails
        pub(crate) fn new(replies: Vec<Result<GenerateResponse>>) -> Self {
            let mut replies = replies;
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn text(text: &str) -> Self {
            Self::new(vec![Ok(GenerateResponse {
                parts: vec![Part::Text(text.to_string())],
            })])
        }

        pub(crate) fn failing() -> Self {
            Self::new(Vec::new())
        }

        pub(crate) fn last_request(&self) -> Option<GenerateRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl AiGateway for StubGateway {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow::anyhow!("stub gateway exhausted")))
        }
    }
}
