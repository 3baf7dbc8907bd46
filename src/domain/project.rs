//! Community project proposals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::UserSummary;
use super::vote::{ProjectVote, VoteTally};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Proposed,
    Approved,
    Rejected,
}

/// Project with its proposer resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub proposer_id: i64,
    pub proposer: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub proposer_id: i64,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub proposer_id: Option<i64>,
}

/// Project as returned by the list endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectListing {
    #[serde(flatten)]
    pub project: Project,
    pub vote_counts: VoteTally,
}

/// Project as returned by the detail endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub votes: Vec<ProjectVote>,
    pub vote_counts: VoteTally,
}

impl ProjectDetail {
    pub fn new(project: Project, votes: Vec<ProjectVote>) -> Self {
        let vote_counts = VoteTally::tally(votes.iter().map(|v| v.vote_type));
        Self {
            project,
            votes,
            vote_counts,
        }
    }
}
