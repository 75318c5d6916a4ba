//! Strategy-driven store selection
//!
//! With both stores configured, calls go to the remote store until it is
//! unreachable once; from then on the wrapper stays in local mode for the
//! rest of its life and replays the failed call locally. Any other remote
//! failure (bad credentials, validation, 5xx) is returned as-is.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use befit_shared::models::{DailyLog, UserProfile};
use chrono::NaiveDate;
use tracing::warn;

use super::{DietStore, StorageStrategy};
use crate::error::{StoreError, StoreResult};
use crate::session::Session;

pub struct FallbackStore {
    remote: Option<Arc<dyn DietStore>>,
    local: Option<Arc<dyn DietStore>>,
    degraded: AtomicBool,
}

/// Run `$call` against the active store, replaying it on the local store
/// when the remote one turns out to be unreachable
macro_rules! dispatch {
    ($self:ident, $op:literal, |$store:ident| $call:expr) => {{
        match $self.active_remote() {
            None => {
                let $store = $self.local_store()?;
                $call.await
            }
            Some($store) => match $call.await {
                Err(err) if err.is_unreachable() && $self.local.is_some() => {
                    $self.degrade($op, &err);
                    let $store = $self.local_store()?;
                    $call.await
                }
                other => other,
            },
        }
    }};
}

impl FallbackStore {
    pub fn new(remote: Arc<dyn DietStore>, local: Arc<dyn DietStore>) -> Self {
        Self {
            remote: Some(remote),
            local: Some(local),
            degraded: AtomicBool::new(false),
        }
    }

    pub fn remote_only(remote: Arc<dyn DietStore>) -> Self {
        Self {
            remote: Some(remote),
            local: None,
            degraded: AtomicBool::new(false),
        }
    }

    pub fn local_only(local: Arc<dyn DietStore>) -> Self {
        Self {
            remote: None,
            local: Some(local),
            degraded: AtomicBool::new(false),
        }
    }

    pub fn strategy(&self) -> StorageStrategy {
        match (&self.remote, &self.local) {
            (Some(_), Some(_)) => StorageStrategy::RemoteWithLocalFallback,
            (Some(_), None) => StorageStrategy::RemoteOnly,
            _ => StorageStrategy::LocalOnly,
        }
    }

    /// True once the remote store has been given up on
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    fn active_remote(&self) -> Option<&dyn DietStore> {
        if self.is_degraded() {
            None
        } else {
            self.remote.as_deref()
        }
    }

    fn local_store(&self) -> StoreResult<&dyn DietStore> {
        self.local
            .as_deref()
            .ok_or_else(|| StoreError::Local(anyhow::anyhow!("no local store configured")))
    }

    fn degrade(&self, operation: &str, err: &StoreError) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            warn!(operation, error = %err, "backend unreachable, switching to local storage");
        }
    }
}

#[async_trait]
impl DietStore for FallbackStore {
    async fn register(&self, name: &str, email: &str, password: &str) -> StoreResult<Session> {
        dispatch!(self, "register", |store| store.register(name, email, password))
    }

    async fn login(&self, email: &str, password: &str) -> StoreResult<Session> {
        dispatch!(self, "login", |store| store.login(email, password))
    }

    async fn load_profile(&self, session: &Session) -> StoreResult<Option<UserProfile>> {
        dispatch!(self, "load_profile", |store| store.load_profile(session))
    }

    async fn save_profile(&self, session: &Session, profile: &UserProfile) -> StoreResult<()> {
        dispatch!(self, "save_profile", |store| store.save_profile(session, profile))
    }

    async fn load_daily_log(&self, session: &Session, date: NaiveDate) -> StoreResult<DailyLog> {
        dispatch!(self, "load_daily_log", |store| store.load_daily_log(session, date))
    }

    async fn save_daily_log(&self, session: &Session, log: &DailyLog) -> StoreResult<()> {
        dispatch!(self, "save_daily_log", |store| store.save_daily_log(session, log))
    }
}
