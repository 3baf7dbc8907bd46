/**
 * Project Handlers
 *
 * All routes require a signed-in user (see `routes::api_routes`). Update and
 * delete additionally require the caller to be the proposer or an admin, and
 * status changes are applied only for admins.
 *
 * Existence is checked before ownership, so a missing id is always 404.
 */

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode};

use crate::backend::error::{ApiError, ErrorBody};
use crate::backend::extract::{IdPath, ValidJson, ValidQuery};
use crate::backend::middleware::AuthUser;
use crate::backend::policy;
use crate::backend::projects::types::{
    CreateProjectRequest, ProjectListQuery, UpdateProjectRequest, VoteRequest,
};
use crate::backend::response::ApiResponse;
use crate::backend::store::{ProjectStore, SharedStore};
use crate::domain::{
    NewProject, PageMeta, Project, ProjectChanges, ProjectDetail, ProjectListing, ProjectVotes,
    Vote, VoteTally, VoteType,
};

async fn load_project(store: &SharedStore, id: i64) -> Result<Project, ApiError> {
    store
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project"))
}

/// Propose a project
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "projects"
)]
pub async fn create_project(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    ValidJson(request): ValidJson<CreateProjectRequest>,
) -> Result<(StatusCode, ApiResponse<Project>), ApiError> {
    let project = store
        .create_project(NewProject {
            title: request.title,
            description: request.description,
            proposer_id: user.id,
        })
        .await?;

    tracing::info!("Project {} created by user {}", project.id, user.id);

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(project).with_message("Project created successfully"),
    ))
}

/// List projects with their vote counts
#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectListQuery),
    responses(
        (status = 200, description = "Page of projects, newest first", body = [ProjectListing]),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 401, description = "Not signed in", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "projects"
)]
pub async fn list_projects(
    State(store): State<SharedStore>,
    ValidQuery(query): ValidQuery<ProjectListQuery>,
) -> Result<ApiResponse<Vec<ProjectListing>>, ApiError> {
    let page = query.page();
    let projects = store.list_projects(&query.filter(), page).await?;

    let ids: Vec<i64> = projects.items.iter().map(|p| p.id).collect();
    let mut votes_by_project: HashMap<i64, Vec<VoteType>> = HashMap::new();
    for vote in store.project_votes(&ids).await? {
        votes_by_project
            .entry(vote.project_id)
            .or_default()
            .push(vote.vote_type);
    }

    let meta = PageMeta::new(page, projects.total);
    let listings = projects
        .items
        .into_iter()
        .map(|project| {
            let votes = votes_by_project.remove(&project.id).unwrap_or_default();
            ProjectListing {
                vote_counts: VoteTally::tally(votes),
                project,
            }
        })
        .collect();

    Ok(ApiResponse::success(listings).with_meta(meta))
}

/// Project with every vote and the tally
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project", body = ProjectDetail),
        (status = 404, description = "No such project", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "projects"
)]
pub async fn get_project(
    State(store): State<SharedStore>,
    IdPath(id): IdPath,
) -> Result<ApiResponse<ProjectDetail>, ApiError> {
    let project = load_project(&store, id).await?;
    let votes = store.project_votes(&[id]).await?;

    Ok(ApiResponse::success(ProjectDetail::new(project, votes)))
}

/// Edit a project (proposer or admin)
#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = i64, Path, description = "Project id")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = Project),
        (status = 403, description = "Not the proposer or an admin", body = ErrorBody),
        (status = 404, description = "No such project", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "projects"
)]
pub async fn update_project(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    ValidJson(request): ValidJson<UpdateProjectRequest>,
) -> Result<ApiResponse<Project>, ApiError> {
    let existing = load_project(&store, id).await?;
    policy::ensure_can_modify(&user, existing.proposer_id)?;

    let changes = ProjectChanges {
        title: request.title,
        description: request.description,
        status: policy::permitted_status(&user, request.status),
    };
    let project = store.update_project(id, changes).await?;

    tracing::info!("Project {} updated by user {}", id, user.id);

    Ok(ApiResponse::success(project).with_message("Project updated successfully"))
}

/// Delete a project and its votes (proposer or admin)
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 403, description = "Not the proposer or an admin", body = ErrorBody),
        (status = 404, description = "No such project", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "projects"
)]
pub async fn delete_project(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
) -> Result<ApiResponse<()>, ApiError> {
    let existing = load_project(&store, id).await?;
    policy::ensure_can_modify(&user, existing.proposer_id)?;

    store.delete_project(id).await?;
    tracing::info!("Project {} deleted by user {}", id, user.id);

    Ok(ApiResponse::message("Project deleted successfully"))
}

/// Cast or change the caller's vote
#[utoipa::path(
    post,
    path = "/api/projects/{id}/vote",
    params(("id" = i64, Path, description = "Project id")),
    request_body = VoteRequest,
    responses(
        (status = 201, description = "First vote by this user", body = Vote),
        (status = 200, description = "Existing vote overwritten", body = Vote),
        (status = 404, description = "No such project", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "projects"
)]
pub async fn vote_on_project(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    IdPath(id): IdPath,
    ValidJson(request): ValidJson<VoteRequest>,
) -> Result<(StatusCode, ApiResponse<Vote>), ApiError> {
    load_project(&store, id).await?;

    let outcome = store.cast_vote(user.id, id, request.vote_type).await?;
    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Vote created successfully")
    } else {
        (StatusCode::OK, "Vote updated successfully")
    };

    tracing::info!(
        "User {} voted {:?} on project {}",
        user.id,
        outcome.vote.vote_type,
        id
    );

    Ok((status, ApiResponse::success(outcome.vote).with_message(message)))
}

/// Every vote on a project with the tally
#[utoipa::path(
    get,
    path = "/api/projects/{id}/votes",
    params(("id" = i64, Path, description = "Project id")),
    responses(
        (status = 200, description = "Votes and tally", body = ProjectVotes),
        (status = 404, description = "No such project", body = ErrorBody),
    ),
    security(("bearerAuth" = [])),
    tag = "projects"
)]
pub async fn project_votes(
    State(store): State<SharedStore>,
    IdPath(id): IdPath,
) -> Result<ApiResponse<ProjectVotes>, ApiError> {
    load_project(&store, id).await?;
    let votes = store.project_votes(&[id]).await?;

    Ok(ApiResponse::success(ProjectVotes::new(id, votes)))
}
