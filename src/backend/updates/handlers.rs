/**
 * X Updates Handlers
 *
 * - `GET /api/x-updates` - public, paginated, newest first
 * - `GET /api/x-updates/{id}` - public
 * - `POST /api/x-updates/refresh` - admin only; runs one sync cycle now
 */

use std::sync::Arc;

use axum::extract::State;

use crate::backend::error::{ApiError, ErrorBody};
use crate::backend::extract::{IdPath, ValidQuery};
use crate::backend::middleware::AuthUser;
use crate::backend::response::ApiResponse;
use crate::backend::store::{SharedStore, UpdateStore};
use crate::backend::updates::service::UpdateSync;
use crate::backend::updates::types::{RefreshSummary, UpdateListQuery};
use crate::domain::{MirroredPost, PageMeta};

/// List mirrored posts
#[utoipa::path(
    get,
    path = "/api/x-updates",
    params(UpdateListQuery),
    responses(
        (status = 200, description = "Page of mirrored posts, newest first", body = [MirroredPost]),
        (status = 400, description = "Invalid query", body = ErrorBody),
    ),
    tag = "x-updates"
)]
pub async fn list_updates(
    State(store): State<SharedStore>,
    ValidQuery(query): ValidQuery<UpdateListQuery>,
) -> Result<ApiResponse<Vec<MirroredPost>>, ApiError> {
    let page = query.page();
    let posts = store.list_posts(&query.filter(), page).await?;

    Ok(ApiResponse::success(posts.items).with_meta(PageMeta::new(page, posts.total)))
}

/// Fetch one mirrored post by local id
#[utoipa::path(
    get,
    path = "/api/x-updates/{id}",
    params(("id" = i64, Path, description = "Local post id")),
    responses(
        (status = 200, description = "The mirrored post", body = MirroredPost),
        (status = 404, description = "No such post", body = ErrorBody),
    ),
    tag = "x-updates"
)]
pub async fn get_update(
    State(store): State<SharedStore>,
    IdPath(id): IdPath,
) -> Result<ApiResponse<MirroredPost>, ApiError> {
    let post = store
        .get_post(id)
        .await?
        .ok_or_else(|| ApiError::not_found("X update"))?;

    Ok(ApiResponse::success(post))
}

/// Run a sync cycle immediately
#[utoipa::path(
    post,
    path = "/api/x-updates/refresh",
    responses(
        (status = 200, description = "Cycle finished", body = RefreshSummary),
        (status = 401, description = "Not signed in", body = ErrorBody),
        (status = 403, description = "Not an admin", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "x-updates"
)]
pub async fn refresh_updates(
    State(sync): State<Arc<UpdateSync>>,
    AuthUser(user): AuthUser,
) -> Result<ApiResponse<RefreshSummary>, ApiError> {
    tracing::info!("Manual X update refresh requested by user {}", user.id);

    let report = sync.run_cycle().await?;
    let summary = RefreshSummary {
        new_updates_count: report.stored.len(),
    };

    Ok(ApiResponse::success(summary).with_message("X updates refreshed successfully"))
}
