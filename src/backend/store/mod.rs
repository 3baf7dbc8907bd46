//! Persistence Layer
//!
//! Storage traits used by handlers and the update-sync service, with two
//! implementations:
//!
//! - **`postgres`** - `PgStore`, backed by a `sqlx::PgPool` and the schema in
//!   `migrations/`
//! - **`memory`** - `MemoryStore`, used when `DATABASE_URL` is not set and by
//!   the test suites
//!
//! Both enforce the same uniqueness rules: user email, username, one vote per
//! (user, project) pair, and one mirrored post per external id. Deleting a
//! project removes its votes.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - Traits, StoreError, SharedStore
//! ├── postgres.rs - sqlx implementation
//! └── memory.rs   - In-process implementation
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    MirroredPost, NewMirroredPost, NewProject, NewTownhall, NewUser, Page, Paged, Project,
    ProjectChanges, ProjectFilter, ProjectVote, Townhall, TownhallChanges, TownhallFilter,
    UpdateFilter, User, VoteOutcome, VoteType,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness rule was violated; carries the constraint name
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    /// The record targeted by an update or delete does not exist
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            other => Self::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// `email` must already be normalized (trimmed, lowercase)
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, project: NewProject) -> StoreResult<Project>;

    /// Newest first
    async fn list_projects(&self, filter: &ProjectFilter, page: Page) -> StoreResult<Paged<Project>>;

    async fn get_project(&self, id: i64) -> StoreResult<Option<Project>>;

    /// Applies only the fields that are `Some`. `NotFound` if the row is gone.
    async fn update_project(&self, id: i64, changes: ProjectChanges) -> StoreResult<Project>;

    /// Removes the project and its votes
    async fn delete_project(&self, id: i64) -> StoreResult<()>;

    /// Insert-or-update keyed on (user, project); at most one vote per pair
    async fn cast_vote(
        &self,
        user_id: i64,
        project_id: i64,
        vote_type: VoteType,
    ) -> StoreResult<VoteOutcome>;

    /// All votes for the given projects, oldest first
    async fn project_votes(&self, project_ids: &[i64]) -> StoreResult<Vec<ProjectVote>>;
}

#[async_trait]
pub trait TownhallStore: Send + Sync {
    async fn create_townhall(&self, townhall: NewTownhall) -> StoreResult<Townhall>;

    /// Soonest first
    async fn list_townhalls(&self, filter: &TownhallFilter, page: Page) -> StoreResult<Paged<Townhall>>;

    async fn get_townhall(&self, id: i64) -> StoreResult<Option<Townhall>>;

    async fn update_townhall(&self, id: i64, changes: TownhallChanges) -> StoreResult<Townhall>;

    async fn delete_townhall(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait UpdateStore: Send + Sync {
    async fn find_post_by_external_id(&self, post_id: &str) -> StoreResult<Option<MirroredPost>>;

    /// `Conflict` if a post with the same external id already exists
    async fn insert_post(
        &self,
        post: NewMirroredPost,
        fetched_at: DateTime<Utc>,
    ) -> StoreResult<MirroredPost>;

    /// Newest `posted_at` first, ties broken by id
    async fn list_posts(&self, filter: &UpdateFilter, page: Page) -> StoreResult<Paged<MirroredPost>>;

    async fn get_post(&self, id: i64) -> StoreResult<Option<MirroredPost>>;

    /// Ids of every post outside the newest `retain` in list order
    async fn post_ids_beyond(&self, retain: usize) -> StoreResult<Vec<i64>>;

    /// Returns the number of rows removed
    async fn delete_posts(&self, ids: &[i64]) -> StoreResult<u64>;
}

/// Everything the HTTP layer and the sync service need from persistence
pub trait Store: UserStore + ProjectStore + TownhallStore + UpdateStore {}

impl<T> Store for T where T: UserStore + ProjectStore + TownhallStore + UpdateStore {}

pub type SharedStore = Arc<dyn Store>;
