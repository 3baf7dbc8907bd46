//! OpenAPI document for the HTTP API.
//!
//! Every handler carries a `#[utoipa::path]` annotation; [`ApiDoc`] collects
//! them and registers the `bearerAuth` scheme used by the protected routes.
//! The document is served at `GET /api-docs/openapi.json` with the server URL
//! taken from configuration.

use axum::extract::State;
use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::server::Server;
use utoipa::{Modify, OpenApi};

use crate::backend::auth::handlers::{AuthPayload, LoginRequest, RegisterRequest};
use crate::backend::error::{ErrorBody, FieldError};
use crate::backend::projects::types::{CreateProjectRequest, UpdateProjectRequest, VoteRequest};
use crate::backend::server::state::AppState;
use crate::backend::townhalls::types::{CreateTownhallRequest, UpdateTownhallRequest};
use crate::backend::updates::types::RefreshSummary;
use crate::domain::{
    MirroredPost, PageMeta, Project, ProjectDetail, ProjectListing, ProjectVotes, Townhall,
    UserView, Vote, VoteTally,
};

/// Name of the bearer security scheme referenced by protected paths
pub const BEARER_AUTH: &str = "bearerAuth";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Oluora API",
        description = "Community projects, votes, townhall meetings and mirrored X updates."
    ),
    paths(
        crate::backend::auth::handlers::register::register,
        crate::backend::auth::handlers::login::login,
        crate::backend::auth::handlers::me::get_me,
        crate::backend::projects::handlers::create_project,
        crate::backend::projects::handlers::list_projects,
        crate::backend::projects::handlers::get_project,
        crate::backend::projects::handlers::update_project,
        crate::backend::projects::handlers::delete_project,
        crate::backend::projects::handlers::vote_on_project,
        crate::backend::projects::handlers::project_votes,
        crate::backend::townhalls::handlers::create_townhall,
        crate::backend::townhalls::handlers::list_townhalls,
        crate::backend::townhalls::handlers::get_townhall,
        crate::backend::townhalls::handlers::update_townhall,
        crate::backend::townhalls::handlers::delete_townhall,
        crate::backend::updates::handlers::list_updates,
        crate::backend::updates::handlers::get_update,
        crate::backend::updates::handlers::refresh_updates,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthPayload,
        UserView,
        CreateProjectRequest,
        UpdateProjectRequest,
        VoteRequest,
        Project,
        ProjectListing,
        ProjectDetail,
        ProjectVotes,
        Vote,
        VoteTally,
        CreateTownhallRequest,
        UpdateTownhallRequest,
        Townhall,
        MirroredPost,
        RefreshSummary,
        PageMeta,
        ErrorBody,
        FieldError,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current user"),
        (name = "projects", description = "Community project proposals and votes"),
        (name = "townhalls", description = "Scheduled townhall meetings"),
        (name = "x-updates", description = "Posts mirrored from X")
    )
)]
pub struct ApiDoc;

/// Build the document advertising `api_base_url` as its server
pub fn openapi(api_base_url: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(api_base_url)]);
    doc
}

/// `GET /api-docs/openapi.json`
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(openapi(&state.api_base_url))
}
