/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/auth/me` - Current user (bearer)
 *
 * ## Projects (bearer)
 * - `POST|GET /api/projects`
 * - `GET|PUT|DELETE /api/projects/{id}`
 * - `POST /api/projects/{id}/vote`
 * - `GET /api/projects/{id}/votes`
 *
 * ## Townhalls (bearer)
 * - `POST|GET /api/townhalls`
 * - `GET|PUT|DELETE /api/townhalls/{id}`
 *
 * ## X updates
 * - `GET /api/x-updates` - public
 * - `GET /api/x-updates/{id}` - public
 * - `POST /api/x-updates/refresh` - bearer + admin
 */

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;

use crate::backend::auth::{get_me, login, register};
use crate::backend::middleware::{auth_middleware, require_admin};
use crate::backend::projects::{
    create_project, delete_project, get_project, list_projects, project_votes, update_project,
    vote_on_project,
};
use crate::backend::server::state::AppState;
use crate::backend::townhalls::{
    create_townhall, delete_townhall, get_townhall, list_townhalls, update_townhall,
};
use crate::backend::updates::{get_update, list_updates, refresh_updates};

/// Configure API routes
///
/// Protected groups carry `auth_middleware` as a route layer so unknown
/// paths still fall through to the 404 fallback instead of answering 401.
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let authenticated = || from_fn_with_state(state.clone(), auth_middleware);

    let auth = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me).route_layer(authenticated()));

    let projects = Router::new()
        .route("/api/projects", post(create_project).get(list_projects))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/projects/{id}/vote", post(vote_on_project))
        .route("/api/projects/{id}/votes", get(project_votes))
        .route_layer(authenticated());

    let townhalls = Router::new()
        .route("/api/townhalls", post(create_townhall).get(list_townhalls))
        .route(
            "/api/townhalls/{id}",
            get(get_townhall).put(update_townhall).delete(delete_townhall),
        )
        .route_layer(authenticated());

    // require_admin is added first so auth_middleware runs before it
    let updates = Router::new()
        .route("/api/x-updates", get(list_updates))
        .route(
            "/api/x-updates/refresh",
            post(refresh_updates)
                .route_layer(from_fn(require_admin))
                .route_layer(authenticated()),
        )
        .route("/api/x-updates/{id}", get(get_update));

    router
        .merge(auth)
        .merge(projects)
        .merge(townhalls)
        .merge(updates)
}
