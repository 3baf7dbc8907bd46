/**
 * Townhall Handlers
 *
 * Same shape as the project handlers: every route needs a signed-in user,
 * update and delete need the organizer or an admin, and only admins may
 * change `status`.
 */

use axum::{extract::State, http::StatusCode};

use crate::backend::error::{ApiError, ErrorBody};
use crate::backend::extract::{IdPath, ValidJson, ValidQuery};
use crate::backend::middleware::AuthUser;
use crate::backend::policy;
use crate::backend::response::ApiResponse;
use crate::backend::store::{SharedStore, TownhallStore};
use crate::backend::townhalls::types::{
    CreateTownhallRequest, TownhallListQuery, UpdateTownhallRequest,
};
use crate::domain::{NewTownhall, PageMeta, Townhall, TownhallChanges};

async fn load_townhall(store: &SharedStore, id: i64) -> Result<Townhall, ApiError> {
    store
        .get_townhall(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Townhall"))
}

/// Schedule a townhall
#[utoipa::path(
    post,
    path = "/api/townhalls",
    request_body = CreateTownhallRequest,
    responses(
        (status = 201, description = "Townhall created", body = Townhall),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "townhalls"
)]
pub async fn create_townhall(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    ValidJson(request): ValidJson<CreateTownhallRequest>,
) -> Result<(StatusCode, ApiResponse<Townhall>), ApiError> {
    let townhall = store
        .create_townhall(NewTownhall {
            title: request.title,
            description: request.description,
            scheduled_at: request.scheduled_at,
            zoom_link: request.zoom_link,
            organizer_id: user.id,
        })
        .await?;

    tracing::info!(
        "Townhall {} scheduled for {} by user {}",
        townhall.id,
        townhall.scheduled_at,
        user.id
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(townhall).with_message("Townhall created successfully"),
    ))
}

/// List townhalls, soonest first
#[utoipa::path(
    get,
    path = "/api/townhalls",
    params(TownhallListQuery),
    responses(
        (status = 200, description = "Page of townhalls ordered by scheduled time", body = [Townhall]),
        (status = 400, description = "Invalid query", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "townhalls"
)]
pub async fn list_townhalls(
    State(store): State<SharedStore>,
    ValidQuery(query): ValidQuery<TownhallListQuery>,
) -> Result<ApiResponse<Vec<Townhall>>, ApiError> {
    let page = query.page();
    let townhalls = store.list_townhalls(&query.filter(), page).await?;

    Ok(ApiResponse::success(townhalls.items).with_meta(PageMeta::new(page, townhalls.total)))
}

#[utoipa::path(
    get,
    path = "/api/townhalls/{id}",
    params(("id" = i64, Path, description = "Townhall id")),
    responses(
        (status = 200, description = "The townhall", body = Townhall),
        (status = 404, description = "No such townhall", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "townhalls"
)]
pub async fn get_townhall(
    State(store): State<SharedStore>,
    IdPath(id): IdPath,
) -> Result<ApiResponse<Townhall>, ApiError> {
    let townhall = load_townhall(&store, id).await?;
    Ok(ApiResponse::success(townhall))
}

/// Edit a townhall (organizer or admin)
#[utoipa::path(
    put,
    path = "/api/townhalls/{id}",
    params(("id" = i64, Path, description = "Townhall id")),
    request_body = UpdateTownhallRequest,
    responses(
        (status = 200, description = "Updated townhall", body = Townhall),
        (status = 403, description = "Not the organizer or an admin", body = ErrorBody),
        (status = 404, description = "No such townhall", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "townhalls"
)]
pub async fn update_townhall(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    ValidJson(request): ValidJson<UpdateTownhallRequest>,
) -> Result<ApiResponse<Townhall>, ApiError> {
    let existing = load_townhall(&store, id).await?;
    policy::ensure_can_modify(&user, existing.organizer_id)?;

    let changes = TownhallChanges {
        title: request.title,
        description: request.description,
        scheduled_at: request.scheduled_at,
        zoom_link: request.zoom_link,
        status: policy::permitted_status(&user, request.status),
    };
    let townhall = store.update_townhall(id, changes).await?;

    tracing::info!("Townhall {} updated by user {}", id, user.id);

    Ok(ApiResponse::success(townhall).with_message("Townhall updated successfully"))
}

/// Delete a townhall (organizer or admin)
#[utoipa::path(
    delete,
    path = "/api/townhalls/{id}",
    params(("id" = i64, Path, description = "Townhall id")),
    responses(
        (status = 200, description = "Townhall deleted"),
        (status = 403, description = "Not the organizer or an admin", body = ErrorBody),
        (status = 404, description = "No such townhall", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "townhalls"
)]
pub async fn delete_townhall(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<ApiResponse<()>, ApiError> {
    let existing = load_townhall(&store, id).await?;
    policy::ensure_can_modify(&user, existing.organizer_id)?;

    store.delete_townhall(id).await?;
    tracing::info!("Townhall {} deleted by user {}", id, user.id);

    Ok(ApiResponse::message("Townhall deleted successfully"))
}
