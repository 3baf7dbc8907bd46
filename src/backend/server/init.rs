/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the database (or fall back to the in-memory store)
 * 2. Build the token issuer, password hasher and X feed client
 * 3. Ensure the bootstrap admin exists, if configured
 * 4. Start the periodic X update sync
 * 5. Create and configure the router
 *
 * The sync task's handle is returned alongside the router so the caller can
 * stop it after the server shuts down.
 *
 * A configured database that cannot be reached, or whose migrations fail,
 * aborts startup.
 */

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;

use crate::backend::auth::credentials::PasswordHasher;
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, AdminSeed, AppConfig, ConfigError};
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, PgStore, SharedStore, UserStore};
use crate::backend::updates::{spawn_sync_loop, FeedSource, UpdateSync, XSearchFeed};
use crate::domain::{NewUser, Role};

/// A configured router plus the background sync task it depends on
pub struct App {
    pub router: Router<()>,
    pub sync_task: JoinHandle<()>,
}

impl App {
    /// Stop the periodic sync; call once the server has stopped serving
    pub fn stop_sync(&self) {
        self.sync_task.abort();
        tracing::info!("X update sync stopped");
    }
}

/// Create and configure the Axum application
///
/// The returned router is ready to serve; the sync task has already been
/// spawned on the current runtime.
pub async fn create_app(config: &AppConfig) -> Result<App, ConfigError> {
    tracing::info!("Initializing Oluora backend server");

    let store: SharedStore = match load_database(config).await? {
        Some(pool) => Arc::new(PgStore::new(pool)),
        None => Arc::new(MemoryStore::new()),
    };

    if config.x_api_key.is_none() {
        tracing::warn!("X_API_KEY not set. X update sync cycles will fetch nothing.");
    }
    let feed = XSearchFeed::new(
        config.x_api_base_url.clone(),
        config.x_api_key.clone(),
        config.x_search_query.clone(),
        config.x_max_results,
    )?;

    let state = build_state(config, store, Arc::new(feed));

    if let Some(seed) = &config.admin {
        seed_admin(&state, seed).await?;
    }

    let sync_task = spawn_sync_loop(state.sync.clone(), config.sync_interval);
    tracing::info!(
        "X update sync scheduled every {}s",
        config.sync_interval.as_secs()
    );

    Ok(App {
        router: create_router(state),
        sync_task,
    })
}

/// Assemble `AppState` around an already opened store and feed
pub fn build_state(
    config: &AppConfig,
    store: SharedStore,
    feed: Arc<dyn FeedSource>,
) -> AppState {
    let sync = UpdateSync::new(store.clone(), feed, config.retention);

    AppState {
        store,
        tokens: Arc::new(TokenIssuer::new(&config.jwt_secret, config.jwt_ttl)),
        passwords: PasswordHasher::new(config.bcrypt_cost),
        sync: Arc::new(sync),
        api_base_url: Arc::from(config.api_base_url.as_str()),
    }
}

/// Create the configured admin account unless one with that email exists
pub async fn seed_admin(state: &AppState, seed: &AdminSeed) -> Result<(), ConfigError> {
    if let Some(existing) = state
        .store
        .find_user_by_email(&seed.email)
        .await
        .map_err(|e| ConfigError::AdminSeed(e.to_string()))?
    {
        if existing.role != Role::Admin {
            tracing::warn!(
                "Account {} exists but is not an admin; leaving it unchanged",
                existing.email
            );
        }
        return Ok(());
    }

    let password_hash = state
        .passwords
        .hash(&seed.password)
        .await
        .map_err(|e| ConfigError::AdminSeed(e.to_string()))?;

    let admin = state
        .store
        .create_user(NewUser {
            email: seed.email.clone(),
            username: seed.username.clone(),
            password_hash,
            role: Role::Admin,
        })
        .await
        .map_err(|e| ConfigError::AdminSeed(e.to_string()))?;

    tracing::info!("Created admin account {} (id {})", admin.email, admin.id);
    Ok(())
}
