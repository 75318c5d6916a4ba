//! Storage abstraction
//!
//! One interface, two implementations (remote API, local document), and a
//! strategy-driven wrapper that degrades from remote to local.

mod fallback;
mod local;
mod remote;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use befit_shared::models::{DailyLog, UserProfile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::StoreResult;
use crate::session::Session;

pub use fallback::FallbackStore;
pub use local::LocalStore;
pub use remote::RemoteStore;

#[async_trait]
pub trait DietStore: Send + Sync {
    /// Create an account and open a session for it
    async fn register(&self, name: &str, email: &str, password: &str) -> StoreResult<Session>;

    async fn login(&self, email: &str, password: &str) -> StoreResult<Session>;

    /// `None` until the account has completed onboarding
    async fn load_profile(&self, session: &Session) -> StoreResult<Option<UserProfile>>;

    async fn save_profile(&self, session: &Session, profile: &UserProfile) -> StoreResult<()>;

    /// The stored log for `date`, or an empty log
    async fn load_daily_log(&self, session: &Session, date: NaiveDate) -> StoreResult<DailyLog>;

    /// Insert or fully replace the log for `log.date`
    async fn save_daily_log(&self, session: &Session, log: &DailyLog) -> StoreResult<()>;
}

/// Which backing store(s) a client uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StorageStrategy {
    RemoteOnly,
    LocalOnly,
    #[default]
    RemoteWithLocalFallback,
}

/// Build the store described by the configuration
pub async fn build_store(config: &ClientConfig) -> StoreResult<FallbackStore> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let local = match &config.local_store_path {
        Some(path) => LocalStore::open(path).await?,
        None => LocalStore::in_memory(),
    };

    match config.strategy {
        StorageStrategy::LocalOnly => Ok(FallbackStore::local_only(Arc::new(local))),
        StorageStrategy::RemoteOnly => {
            let remote = RemoteStore::new(&config.api_base_url, timeout)?;
            Ok(FallbackStore::remote_only(Arc::new(remote)))
        }
        StorageStrategy::RemoteWithLocalFallback => {
            let remote = RemoteStore::new(&config.api_base_url, timeout)?;
            Ok(FallbackStore::new(Arc::new(remote), Arc::new(local)))
        }
    }
}
