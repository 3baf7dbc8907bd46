/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The store handle (PostgreSQL or in-memory)
 * - Token issuer and password hasher
 * - The update-sync service shared with the background task
 * - The public API base URL advertised in the OpenAPI document
 *
 * Everything is constructed once in `init::create_app` and cloned into each
 * handler; all fields are cheap `Arc`/`Copy` clones.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`.
 *
 * ```rust,ignore
 * async fn handler(State(store): State<SharedStore>) {
 *     let user = store.get_user(1).await;
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::credentials::PasswordHasher;
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::store::SharedStore;
use crate::backend::updates::UpdateSync;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Persistence handle
    pub store: SharedStore,

    /// Signs and verifies bearer tokens
    pub tokens: Arc<TokenIssuer>,

    /// bcrypt at the configured cost
    pub passwords: PasswordHasher,

    /// Update-sync service, also driven by the timer task
    pub sync: Arc<UpdateSync>,

    /// Base URL of the API as seen by clients, e.g. `http://localhost:3000/api`
    pub api_base_url: Arc<str>,
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for PasswordHasher {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.passwords
    }
}

impl FromRef<AppState> for Arc<UpdateSync> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sync.clone()
    }
}
