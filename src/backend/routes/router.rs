/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check and OpenAPI document
 * 2. API routes (auth, projects, townhalls, x-updates)
 * 3. Fallback handlers (404 for unknown paths, 405 for unsupported methods)
 *
 * Request tracing and permissive CORS wrap every route, including the
 * fallback.
 */

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::docs::openapi_json;
use crate::backend::error::ApiError;
use crate::backend::response::ApiResponse;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// ## Public
///
/// - `GET /health` - Liveness probe
/// - `GET /api-docs/openapi.json` - OpenAPI document
///
/// ## API
///
/// See [`configure_api_routes`].
///
/// ## Fallback
///
/// Unknown paths get a 404 error envelope with "Route not found"; a known
/// path hit with an unsupported method gets a 405 envelope.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    let router = configure_api_routes(router, &app_state);

    router
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn health() -> ApiResponse<()> {
    ApiResponse::message("Server is healthy")
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed".to_string())
}
