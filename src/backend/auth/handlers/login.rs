/**
 * Login Handler
 *
 * This module implements the user authentication handler for
 * POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by (normalized) email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info
 *
 * # Security
 *
 * - Unknown email and wrong password give the same 401 "Invalid credentials"
 * - Passwords are never logged or returned in responses
 */

use axum::extract::State;

use crate::backend::auth::handlers::types::{AuthPayload, LoginRequest};
use crate::backend::error::{ApiError, ErrorBody};
use crate::backend::extract::ValidJson;
use crate::backend::response::ApiResponse;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;
use crate::domain::UserView;

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Malformed email or empty password
/// * `401 Unauthorized` - Unknown email or wrong password
/// * `500 Internal Server Error` - Store or signing failure
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthPayload),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<ApiResponse<AuthPayload>, ApiError> {
    let user = state
        .store
        .find_user_by_email(&request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login failed, unknown email: {}", request.email);
            invalid_credentials()
        })?;

    if !state.passwords.verify(&request.password, &user.password_hash).await? {
        tracing::warn!("Login failed, wrong password for user {}", user.id);
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(&user)?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok(ApiResponse::success(AuthPayload {
        user: UserView::from(&user),
        token,
    })
    .with_message("Login successful"))
}
