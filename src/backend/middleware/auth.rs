/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header, reloads the user from the store and provides
 * the user to handlers.
 *
 * # Layers
 *
 * - `auth_middleware` - any signed-in user; 401 otherwise
 * - `require_admin` - must run inside `auth_middleware`; 403 unless the
 *   stored role is elevated
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;
use crate::domain::{Role, User};

/// Authenticated user data, loaded from the store on every request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_elevated()
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts JWT token from Authorization header
/// 2. Verifies signature and expiry
/// 3. Reloads the user named by the token's subject
/// 4. Attaches user data to request extensions for use in handlers
///
/// Returns 401 when the header is missing, the token is invalid or expired,
/// or the user no longer exists.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        tracing::warn!("Missing or malformed Authorization header");
        ApiError::unauthorized("Access token required")
    })?;

    let claims = app_state.tokens.verify(token).map_err(|rejection| {
        tracing::warn!("Rejected bearer token: {:?}", rejection);
        ApiError::unauthorized(rejection.message())
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::warn!("Token subject is not a user id: {}", claims.sub);
        ApiError::unauthorized("Invalid token")
    })?;

    let user = app_state.store.get_user(user_id).await?.ok_or_else(|| {
        tracing::warn!("Token refers to missing user {}", user_id);
        ApiError::unauthorized("Invalid token")
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(&user));

    Ok(next.run(request).await)
}

/// Admin gate for routes already behind `auth_middleware`
pub async fn require_admin(
    AuthUser(user): AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !user.is_admin() {
        tracing::warn!("User {} ({}) denied admin route", user.id, user.role.as_str());
        return Err(ApiError::forbidden());
    }

    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// This can be used as a parameter in handlers to automatically extract
/// the authenticated user from request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::unauthorized("Access token required")
            })?;

        Ok(AuthUser(user))
    }
}
