//! Ownership rules for project and townhall mutations.

use crate::backend::error::ApiError;
use crate::backend::middleware::AuthenticatedUser;

/// The creator of a resource or an admin may change or delete it
pub fn ensure_can_modify(actor: &AuthenticatedUser, owner_id: i64) -> Result<(), ApiError> {
    if actor.id == owner_id || actor.is_admin() {
        return Ok(());
    }

    tracing::warn!(
        "User {} tried to modify a resource owned by {}",
        actor.id,
        owner_id
    );
    Err(ApiError::forbidden())
}

/// Status changes from non-admins are dropped, not rejected
pub fn permitted_status<T>(actor: &AuthenticatedUser, requested: Option<T>) -> Option<T> {
    match requested {
        Some(status) if actor.is_admin() => Some(status),
        Some(_) => {
            tracing::debug!("Ignoring status change from non-admin user {}", actor.id);
            None
        }
        None => None,
    }
}
