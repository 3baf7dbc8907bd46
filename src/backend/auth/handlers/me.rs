/**
 * Get Current User Handler
 *
 * GET /api/auth/me returns the signed-in user. The auth middleware has
 * already verified the token; the user is re-read here so the response
 * carries current data.
 */

use axum::extract::State;

use crate::backend::error::{ApiError, ErrorBody};
use crate::backend::middleware::AuthUser;
use crate::backend::response::ApiResponse;
use crate::backend::store::{SharedStore, UserStore};
use crate::domain::UserView;

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "The signed-in user", body = UserView),
        (status = 401, description = "Missing, invalid or expired token", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "auth"
)]
pub async fn get_me(
    State(store): State<SharedStore>,
    AuthUser(auth): AuthUser,
) -> Result<ApiResponse<UserView>, ApiError> {
    let user = store.get_user(auth.id).await?.ok_or_else(|| {
        tracing::warn!("Authenticated user {} disappeared", auth.id);
        ApiError::unauthorized("Invalid token")
    })?;

    Ok(ApiResponse::success(UserView::from(&user)))
}
