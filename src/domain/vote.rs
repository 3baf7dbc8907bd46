/**
 * Votes and Vote Aggregation
 *
 * A user holds at most one vote per project. Re-voting overwrites the vote
 * type in place, so the tally below never sees two votes from the same user
 * for the same project.
 *
 * # Tally
 *
 * The tally is a fixed two-bucket count: `upvotes`, `downvotes`, and
 * `total = upvotes + downvotes`. There is no weighting or decay.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::VoterSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "vote_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    Upvote,
    Downvote,
}

/// Vote as stored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow, ToSchema)]
pub struct Vote {
    pub id: i64,
    pub user_id: i64,
    pub project_id: i64,
    pub vote_type: VoteType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of casting a vote
///
/// `created` is false when an existing vote was overwritten.
#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub vote: Vote,
    pub created: bool,
}

/// Vote with its voter, as listed on a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ProjectVote {
    pub project_id: i64,
    pub vote_type: VoteType,
    pub user: VoterSummary,
}

/// Up/down counts for one project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VoteTally {
    pub upvotes: u64,
    pub downvotes: u64,
    pub total: u64,
}

impl VoteTally {
    /// Count a project's votes into the two buckets
    pub fn tally<I>(votes: I) -> Self
    where
        I: IntoIterator<Item = VoteType>,
    {
        let mut tally = Self::default();
        for vote in votes {
            tally.record(vote);
        }
        tally
    }

    fn record(&mut self, vote: VoteType) {
        match vote {
            VoteType::Upvote => self.upvotes += 1,
            VoteType::Downvote => self.downvotes += 1,
        }
        self.total = self.upvotes + self.downvotes;
    }
}

/// Body of `GET /api/projects/{id}/votes`
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectVotes {
    pub project_id: i64,
    pub vote_counts: VoteTally,
    pub votes: Vec<ProjectVote>,
}

impl ProjectVotes {
    pub fn new(project_id: i64, votes: Vec<ProjectVote>) -> Self {
        Self {
            project_id,
            vote_counts: VoteTally::tally(votes.iter().map(|v| v.vote_type)),
            votes,
        }
    }
}
