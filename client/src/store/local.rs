//! Store backed by a single JSON document
//!
//! Accounts, profiles, and logs are keyed by email. The document lives in
//! memory and, when opened from a path, is rewritten to disk after every
//! mutation (temp file then rename).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Context;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use befit_shared::models::{DailyLog, UserProfile};
use befit_shared::validation::{normalize_email, validate_email, validate_password};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::DietStore;
use crate::error::{StoreError, StoreResult};
use crate::session::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalAccount {
    name: String,
    password_hash: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    users: HashMap<String, LocalAccount>,
    #[serde(default)]
    profiles: HashMap<String, UserProfile>,
    #[serde(default)]
    logs: HashMap<String, BTreeMap<NaiveDate, DailyLog>>,
}

pub struct LocalStore {
    doc: RwLock<Document>,
    path: Option<PathBuf>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self {
            doc: RwLock::new(Document::default()),
            path: None,
        }
    }

    /// Open (or start) a document persisted at `path`
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt local store at {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "starting new local store");
                Document::default()
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("failed to read {}", path.display()))
                    .into())
            }
        };

        Ok(Self {
            doc: RwLock::new(doc),
            path: Some(path),
        })
    }

    async fn persist(&self, doc: &Document) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(doc).context("failed to encode local store")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("failed to replace {}", path.display()))?;

        debug!(path = %path.display(), "local store saved");
        Ok(())
    }
}

async fn hash_password(password: String) -> StoreResult<String> {
    let hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))
    })
    .await
    .context("hashing task panicked")??;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> StoreResult<bool> {
    let ok = tokio::task::spawn_blocking(move || {
        PasswordHash::new(&hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .map_err(|e| anyhow::anyhow!("invalid stored hash: {e}"))
    })
    .await
    .context("verification task panicked")??;
    Ok(ok)
}

#[async_trait]
impl DietStore for LocalStore {
    async fn register(&self, name: &str, email: &str, password: &str) -> StoreResult<Session> {
        let email = normalize_email(email);
        validate_email(&email).map_err(StoreError::Validation)?;
        validate_password(password).map_err(StoreError::Validation)?;

        if self.doc.read().await.users.contains_key(&email) {
            return Err(StoreError::Auth("User already exists".to_string()));
        }

        let password_hash = hash_password(password.to_string()).await?;

        let mut doc = self.doc.write().await;
        // Re-check under the write lock; hashing ran unlocked
        if doc.users.contains_key(&email) {
            return Err(StoreError::Auth("User already exists".to_string()));
        }
        doc.users.insert(
            email.clone(),
            LocalAccount {
                name: name.trim().to_string(),
                password_hash,
            },
        );
        self.persist(&doc).await?;

        info!(%email, "local account created");
        Ok(Session::local(email))
    }

    async fn login(&self, email: &str, password: &str) -> StoreResult<Session> {
        let email = normalize_email(email);
        let stored = self
            .doc
            .read()
            .await
            .users
            .get(&email)
            .map(|account| account.password_hash.clone());

        let Some(hash) = stored else {
            return Err(StoreError::Auth("Invalid credentials".to_string()));
        };
        if !verify_password(password.to_string(), hash).await? {
            return Err(StoreError::Auth("Invalid credentials".to_string()));
        }

        Ok(Session::local(email))
    }

    async fn load_profile(&self, session: &Session) -> StoreResult<Option<UserProfile>> {
        Ok(self.doc.read().await.profiles.get(&session.email).cloned())
    }

    async fn save_profile(&self, session: &Session, profile: &UserProfile) -> StoreResult<()> {
        let mut doc = self.doc.write().await;
        doc.profiles.insert(session.email.clone(), profile.clone());
        self.persist(&doc).await
    }

    async fn load_daily_log(&self, session: &Session, date: NaiveDate) -> StoreResult<DailyLog> {
        let doc = self.doc.read().await;
        Ok(doc
            .logs
            .get(&session.email)
            .and_then(|by_date| by_date.get(&date))
            .cloned()
            .unwrap_or_else(|| DailyLog::empty(date)))
    }

    async fn save_daily_log(&self, session: &Session, log: &DailyLog) -> StoreResult<()> {
        let mut doc = self.doc.write().await;
        doc.logs
            .entry(session.email.clone())
            .or_default()
            .insert(log.date, log.clone());
        self.persist(&doc).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use befit_shared::models::{MacroNutrients, MealType, NewMeal, ProfileInput};
    use chrono::Utc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn log_with(names: &[&str]) -> DailyLog {
        let mut log = DailyLog::empty(date());
        for name in names {
            log.push_meal(
                NewMeal {
                    name: name.to_string(),
                    macros: MacroNutrients { calories: 300.0, protein: 20.0, carbs: 30.0, fat: 10.0 },
                    image: None,
                    notes: None,
                    meal_type: MealType::Lunch,
                }
                .into_meal_log(Utc::now()),
            );
        }
        log
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = LocalStore::in_memory();
        let session = store.register("Susan", "Susan@Example.com", "password123").await.unwrap();
        assert_eq!(session, Session::local("susan@example.com"));

        let again = store.login("susan@example.com", "password123").await.unwrap();
        assert_eq!(again.email, "susan@example.com");
        assert!(again.bearer().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let store = LocalStore::in_memory();
        store.register("Susan", "susan@example.com", "password123").await.unwrap();

        let err = store.register("Other", "susan@example.com", "password456").await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_account_look_the_same() {
        let store = LocalStore::in_memory();
        store.register("Susan", "susan@example.com", "password123").await.unwrap();

        let wrong = store.login("susan@example.com", "password999").await.unwrap_err();
        let unknown = store.login("nobody@example.com", "password123").await.unwrap_err();
        assert_eq!(wrong.to_string(), "Invalid credentials");
        assert_eq!(unknown.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_short_password_is_validation_error() {
        let store = LocalStore::in_memory();
        let err = store.register("Susan", "susan@example.com", "short").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_undotted_domain_is_validation_error() {
        let store = LocalStore::in_memory();
        let err = store.register("Susan", "susan@localhost", "password123").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref msg) if msg == "Invalid email format"));
    }

    #[tokio::test]
    async fn test_missing_profile_and_log_defaults() {
        let store = LocalStore::in_memory();
        let session = Session::local("karen@example.com");

        assert!(store.load_profile(&session).await.unwrap().is_none());
        assert_eq!(store.load_daily_log(&session, date()).await.unwrap(), DailyLog::empty(date()));
    }

    #[tokio::test]
    async fn test_save_daily_log_replaces() {
        let store = LocalStore::in_memory();
        let session = Session::local("karen@example.com");

        store.save_daily_log(&session, &log_with(&["Soup", "Salad"])).await.unwrap();
        store.save_daily_log(&session, &log_with(&["Pasta"])).await.unwrap();

        let loaded = store.load_daily_log(&session, date()).await.unwrap();
        assert_eq!(loaded.meals.len(), 1);
        assert_eq!(loaded.meals[0].name, "Pasta");
    }

    #[tokio::test]
    async fn test_logs_are_isolated_per_account() {
        let store = LocalStore::in_memory();
        let karen = Session::local("karen@example.com");
        let nancy = Session::local("nancy@example.com");

        store.save_daily_log(&karen, &log_with(&["Soup"])).await.unwrap();
        assert!(store.load_daily_log(&nancy, date()).await.unwrap().meals.is_empty());
    }

    #[tokio::test]
    async fn test_document_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("befit").join("store.json");

        let profile = ProfileInput {
            name: "Betty".to_string(),
            ..Default::default()
        }
        .into_profile();

        {
            let store = LocalStore::open(&path).await.unwrap();
            let session = store.register("Betty", "betty@example.com", "password123").await.unwrap();
            store.save_profile(&session, &profile).await.unwrap();
            store.save_daily_log(&session, &log_with(&["Eggs"])).await.unwrap();
        }

        let reopened = LocalStore::open(&path).await.unwrap();
        let session = reopened.login("betty@example.com", "password123").await.unwrap();
        assert_eq!(reopened.load_profile(&session).await.unwrap(), Some(profile));
        assert_eq!(reopened.load_daily_log(&session, date()).await.unwrap().meals[0].name, "Eggs");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_local_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"{not json").unwrap();

        let err = LocalStore::open(file.path()).await.err().unwrap();
        assert!(matches!(err, StoreError::Local(_)));
    }
}
