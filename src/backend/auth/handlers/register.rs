/**
 * Register Handler
 *
 * This module implements the user registration handler for
 * POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate email, username and password (extractor)
 * 2. Check that neither the email nor the username is taken
 * 3. Hash password using bcrypt
 * 4. Create user with the USER role
 * 5. Generate JWT token
 * 6. Return 201 with token and user info
 *
 * The up-front checks give specific conflict messages; the store's unique
 * constraints still catch a concurrent registration, which surfaces as a
 * generic 409.
 */

use axum::{extract::State, http::StatusCode};

use crate::backend::auth::handlers::types::{AuthPayload, RegisterRequest};
use crate::backend::error::{ApiError, ErrorBody};
use crate::backend::extract::ValidJson;
use crate::backend::response::ApiResponse;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;
use crate::domain::{NewUser, Role, UserView};

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - A field failed validation
/// * `409 Conflict` - Email or username already registered
/// * `500 Internal Server Error` - Store, hashing or signing failure
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthPayload),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Email or username taken", body = ErrorBody),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<AuthPayload>), ApiError> {
    if state.store.find_user_by_email(&request.email).await?.is_some() {
        tracing::warn!("Registration rejected, email taken: {}", request.email);
        return Err(ApiError::conflict("User with this email already exists"));
    }
    if state
        .store
        .find_user_by_username(&request.username)
        .await?
        .is_some()
    {
        tracing::warn!("Registration rejected, username taken: {}", request.username);
        return Err(ApiError::conflict("User with this username already exists"));
    }

    let password_hash = state.passwords.hash(&request.password).await?;

    let user = state
        .store
        .create_user(NewUser {
            email: request.email,
            username: request.username,
            password_hash,
            role: Role::User,
        })
        .await?;

    let token = state.tokens.issue(&user)?;

    tracing::info!("User registered: {} ({})", user.username, user.email);

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(AuthPayload {
            user: UserView::from(&user),
            token,
        })
        .with_message("User registered successfully"),
    ))
}
