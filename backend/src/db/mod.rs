//! Database connection and pool management
//!
//! Pool creation, migrations, health checks, and optional demo seeding.

use anyhow::Result;
use befit_shared::models::{ActivityLevel, Gender, Goal, ProfileInput};
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::auth::PasswordService;
use crate::repositories::UserRepository;

/// Database configuration for pool creation
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

/// Create a PostgreSQL connection pool with production-ready settings
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let config = DbConfig {
        url: database_url.to_string(),
        max_connections,
        ..Default::default()
    };
    create_pool_with_config(&config).await
}

/// Create a PostgreSQL connection pool with custom configuration
pub async fn create_pool_with_config(config: &DbConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)?.application_name("befit");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        "Database pool created: max={}, min={}",
        config.max_connections, config.min_connections
    );

    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Database health check failed: {}", e);
            e.into()
        })
}

// ============================================================================
// Demo data
// ============================================================================

pub const DEMO_USER_COUNT: usize = 100;
pub const DEMO_PASSWORD: &str = "password123";

const FIRST_NAMES: [&str; 10] = [
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth",
];
const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez",
];

/// A generated demo account
#[derive(Debug, Clone)]
pub struct DemoUser {
    pub email: String,
    pub name: String,
    pub profile: ProfileInput,
}

/// Generate a random demo account; `index` keeps emails unique
pub fn demo_user<R: Rng + ?Sized>(rng: &mut R, index: usize) -> DemoUser {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("James");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
    let name = format!("{} {}", first, last);
    let email = format!("{}.{}{}@example.com", first.to_lowercase(), last.to_lowercase(), index);

    let goal = [Goal::LoseWeight, Goal::Maintain, Goal::GainMuscle]
        .choose(rng)
        .copied()
        .unwrap_or_default();
    let activity_level = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
    ]
    .choose(rng)
    .cloned()
    .unwrap_or_default();

    let profile = ProfileInput {
        name: name.clone(),
        age: rng.gen_range(20..60),
        gender: if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female },
        height: f64::from(rng.gen_range(160..190)),
        weight: f64::from(rng.gen_range(60..100)),
        goal,
        activity_level,
        dietary_restrictions: "None".to_string(),
    };

    DemoUser { email, name, profile }
}

/// Seed demo accounts when the users table is below the demo count
///
/// Targets are derived from the random biometrics. All demo accounts share
/// one hashed password.
pub async fn seed_demo_users(pool: &PgPool) -> Result<usize> {
    let existing = UserRepository::count(pool).await?;
    if existing >= DEMO_USER_COUNT as i64 {
        return Ok(0);
    }

    info!("Seeding database with {} demo users...", DEMO_USER_COUNT);
    let password_hash = PasswordService::hash_async(DEMO_PASSWORD.to_string()).await?;

    let users: Vec<DemoUser> = {
        let mut rng = rand::thread_rng();
        (0..DEMO_USER_COUNT).map(|i| demo_user(&mut rng, i)).collect()
    };

    let mut inserted = 0;
    for user in users {
        let profile = user.profile.into_profile();
        if UserRepository::insert_seed(pool, &user.email, &password_hash, &user.name, &profile).await? {
            inserted += 1;
        }
    }

    info!(inserted, "Demo seeding complete");
    Ok(inserted)
}
