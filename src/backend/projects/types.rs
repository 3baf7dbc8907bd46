//! Request types for `/api/projects`.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::backend::extract::normalize;
use crate::domain::{Page, ProjectFilter, ProjectStatus, VoteType};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectRequest {
    #[serde(deserialize_with = "normalize::trimmed")]
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: String,
    #[serde(deserialize_with = "normalize::trimmed")]
    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: String,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProjectRequest {
    #[serde(default, deserialize_with = "normalize::trimmed_opt")]
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "normalize::trimmed_opt")]
    #[validate(length(
        min = 20,
        max = 2000,
        message = "Description must be between 20 and 2000 characters"
    ))]
    pub description: Option<String>,
    /// Applied only when the caller is an admin
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VoteRequest {
    pub vote_type: VoteType,
}

/// `GET /api/projects` query string
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectListQuery {
    /// One-based page number (default 1)
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 10)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    pub status: Option<ProjectStatus>,
    /// Only projects proposed by this user id
    #[validate(range(min = 1, message = "Proposer must be a positive integer"))]
    pub proposer: Option<i64>,
}

impl ProjectListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.limit)
    }

    pub fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            status: self.status,
            proposer_id: self.proposer,
        }
    }
}
