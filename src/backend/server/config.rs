/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration from
 * environment variables (optionally seeded from a `.env` file by the binary),
 * and opening the optional PostgreSQL database.
 *
 * # Variables
 *
 * | Variable | Default |
 * |---|---|
 * | `PORT` | `3000` |
 * | `DATABASE_URL` | unset: in-memory store |
 * | `JWT_SECRET` | insecure development secret, with a warning |
 * | `JWT_TTL_HOURS` | `168` |
 * | `BCRYPT_COST` | `10` |
 * | `X_API_KEY` | unset: sync cycles fetch nothing |
 * | `X_API_BASE_URL` | `https://api.twitter.com` |
 * | `X_SEARCH_QUERY` | `#AbiaState -is:retweet` |
 * | `X_MAX_RESULTS` | `10` |
 * | `X_SYNC_INTERVAL_SECS` | `600` |
 * | `X_RETENTION` | `1000` |
 * | `API_BASE_URL` | `http://localhost:{PORT}/api` |
 * | `ADMIN_EMAIL`, `ADMIN_USERNAME`, `ADMIN_PASSWORD` | unset: no bootstrap admin |
 *
 * Empty values count as unset. Values that fail to parse or fall outside
 * their range are a startup error.
 */

use std::{fmt::Display, str::FromStr, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::backend::updates::{FeedError, DEFAULT_RETENTION};

const DEV_JWT_SECRET: &str = "oluora-development-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to run database migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("failed to build X API client: {0}")]
    Feed(#[from] FeedError),

    #[error("failed to create admin account: {0}")]
    AdminSeed(String),
}

/// Credentials for an admin account created at startup if missing
#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct AdminSeed {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub bcrypt_cost: u32,
    pub x_api_key: Option<String>,
    pub x_api_base_url: String,
    pub x_search_query: String,
    pub x_max_results: u8,
    pub sync_interval: Duration,
    pub retention: usize,
    pub api_base_url: String,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the raw value for a key
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = try_load(&var, "PORT", 3000)?;

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using an insecure development secret");
            DEV_JWT_SECRET.to_string()
        });

        let jwt_ttl_hours: u64 = try_load(&var, "JWT_TTL_HOURS", 168)?;
        ensure(jwt_ttl_hours >= 1, "JWT_TTL_HOURS", "must be at least 1")?;

        let bcrypt_cost: u32 = try_load(&var, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        ensure(
            (4..=31).contains(&bcrypt_cost),
            "BCRYPT_COST",
            "must be between 4 and 31",
        )?;

        let x_max_results: u8 = try_load(&var, "X_MAX_RESULTS", 10)?;
        ensure(
            (10..=100).contains(&x_max_results),
            "X_MAX_RESULTS",
            "must be between 10 and 100",
        )?;

        let sync_secs: u64 = try_load(&var, "X_SYNC_INTERVAL_SECS", 600)?;
        ensure(sync_secs >= 1, "X_SYNC_INTERVAL_SECS", "must be at least 1")?;

        let retention: usize = try_load(&var, "X_RETENTION", DEFAULT_RETENTION)?;
        ensure(retention >= 1, "X_RETENTION", "must be at least 1")?;

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(username), Some(password)) => Some(AdminSeed {
                email: email.trim().to_lowercase(),
                username,
                password,
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "ADMIN_EMAIL",
                    reason: "ADMIN_EMAIL, ADMIN_USERNAME and ADMIN_PASSWORD must be set together"
                        .to_string(),
                })
            }
        };

        Ok(Self {
            port,
            database_url: var("DATABASE_URL"),
            jwt_secret,
            jwt_ttl: Duration::from_secs(jwt_ttl_hours * 60 * 60),
            bcrypt_cost,
            x_api_key: var("X_API_KEY"),
            x_api_base_url: var("X_API_BASE_URL")
                .unwrap_or_else(|| "https://api.twitter.com".to_string()),
            x_search_query: var("X_SEARCH_QUERY")
                .unwrap_or_else(|| "#AbiaState -is:retweet".to_string()),
            x_max_results,
            sync_interval: Duration::from_secs(sync_secs),
            retention,
            api_base_url: var("API_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}/api")),
            admin,
        })
    }
}

fn try_load<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            tracing::warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                reason: e.to_string(),
            }
        }),
        None => {
            tracing::debug!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn ensure(condition: bool, key: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            reason: reason.to_string(),
        })
    }
}

/// Open the database pool and run migrations
///
/// # Returns
///
/// - `Ok(Some(pool))` if `DATABASE_URL` is set and the database is ready
/// - `Ok(None)` if `DATABASE_URL` is not set; the caller falls back to the
///   in-memory store
/// - `Err` if the database is configured but unreachable or migrations fail
pub async fn load_database(config: &AppConfig) -> Result<Option<PgPool>, ConfigError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data is lost on restart.");
        return Ok(None);
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed successfully");

    Ok(Some(pool))
}
