//! Store backed by the BeFit HTTP API

use std::time::Duration;

use async_trait::async_trait;
use befit_shared::models::{DailyLog, ProfileInput, UserProfile};
use befit_shared::types::{AuthSession, LoginRequest, RegisterRequest};
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::DietStore;
use crate::error::{StoreError, StoreResult};
use crate::session::Session;

/// Shape of the backend's error body: `{"error": {"code", "message"}}`
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

pub struct RemoteStore {
    client: Client,
    api_url: String,
}

impl RemoteStore {
    /// `base_url` is the backend origin, e.g. `http://localhost:8080`
    pub fn new(base_url: &str, timeout: Duration) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| StoreError::Local(anyhow::anyhow!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: format!("{}/api/v1", base_url.trim_end_matches('/')),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> StoreResult<RequestBuilder> {
        let token = session
            .bearer()
            .ok_or_else(|| StoreError::Auth("Not signed in".to_string()))?;
        Ok(builder.bearer_auth(token))
    }

    async fn send(&self, builder: RequestBuilder) -> StoreResult<Response> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        debug!(status = status.as_u16(), %message, "backend rejected request");

        Err(rejection(status, message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Protocol(e.to_string()))
    }

    async fn open_session(&self, builder: RequestBuilder) -> StoreResult<Session> {
        let response = self.send(builder).await?;
        let issued: AuthSession = Self::decode(response).await?;
        Ok(Session::remote(issued.email, issued.token))
    }
}

/// Map a non-success status to the store error the caller sees
fn rejection(status: StatusCode, message: String) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::CONFLICT => StoreError::Auth(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StoreError::Validation(message),
        _ => StoreError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}

/// Anything that failed before a response arrived counts as unreachable
fn transport_error(err: reqwest::Error) -> StoreError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        StoreError::Unreachable(err.to_string())
    } else {
        StoreError::Protocol(err.to_string())
    }
}

#[async_trait]
impl DietStore for RemoteStore {
    async fn register(&self, name: &str, email: &str, password: &str) -> StoreResult<Session> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.open_session(self.client.post(self.url("/auth/register")).json(&body))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> StoreResult<Session> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.open_session(self.client.post(self.url("/auth/login")).json(&body))
            .await
    }

    async fn load_profile(&self, session: &Session) -> StoreResult<Option<UserProfile>> {
        let request = self.authorized(self.client.get(self.url("/profile")), session)?;
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn save_profile(&self, session: &Session, profile: &UserProfile) -> StoreResult<()> {
        let input = ProfileInput::from(profile.clone());
        let request = self.authorized(self.client.put(self.url("/profile")).json(&input), session)?;
        self.send(request).await?;
        Ok(())
    }

    async fn load_daily_log(&self, session: &Session, date: NaiveDate) -> StoreResult<DailyLog> {
        let path = format!("/logs/{}", date.format("%Y-%m-%d"));
        let request = self.authorized(self.client.get(self.url(&path)), session)?;
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn save_daily_log(&self, session: &Session, log: &DailyLog) -> StoreResult<()> {
        let request = self.authorized(self.client.put(self.url("/logs")).json(log), session)?;
        self.send(request).await?;
        Ok(())
    }
}
