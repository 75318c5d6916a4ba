//! Application state management
//!
//! Shared state passed to all request handlers via Axum's state extraction.
//! Every field is cheap to clone: the pool, config, JWT keys, and gateway
//! are all reference counted.

use crate::ai::{build_gateway, AiGateway};
use crate::auth::JwtService;
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    /// Generative model gateway used by the coach endpoints
    pub ai: Arc<dyn AiGateway>,
}

impl AppState {
    /// Create state with the gateway described by `config.ai`
    ///
    /// JWT keys are derived here, so call this once at startup.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let ai = build_gateway(&config.ai);
        Self::with_ai(db, config, ai)
    }

    /// Create state with an explicit gateway
    pub fn with_ai(db: PgPool, config: AppConfig, ai: Arc<dyn AiGateway>) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            ai,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn ai(&self) -> &dyn AiGateway {
        self.ai.as_ref()
    }
}
