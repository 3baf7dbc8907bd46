/**
 * In-Memory Store
 *
 * `MemoryStore` keeps every table in process memory behind one
 * `tokio::sync::RwLock`. The server falls back to it when `DATABASE_URL` is
 * not set, and the test suites use it in place of PostgreSQL.
 *
 * Each trait method takes the lock once, so every operation is atomic with
 * respect to the others. That covers the invariants the database would
 * otherwise enforce:
 *
 * - unique email and username
 * - one vote per (user, project)
 * - one mirrored post per external id
 * - votes removed along with their project
 *
 * Ids are assigned per table starting at 1, like `BIGSERIAL`.
 */

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::backend::store::{
    ProjectStore, StoreError, StoreResult, TownhallStore, UpdateStore, UserStore,
};
use crate::domain::{
    MirroredPost, NewMirroredPost, NewProject, NewTownhall, NewUser, Page, Paged, Project,
    ProjectChanges, ProjectFilter, ProjectStatus, ProjectVote, Townhall, TownhallChanges,
    TownhallFilter, TownhallStatus, UpdateFilter, User, UserSummary, Vote, VoteOutcome, VoteType,
    VoterSummary,
};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Clone)]
struct ProjectRecord {
    id: i64,
    title: String,
    description: String,
    status: ProjectStatus,
    proposer_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct TownhallRecord {
    id: i64,
    title: String,
    description: String,
    scheduled_at: DateTime<Utc>,
    zoom_link: Option<String>,
    status: TownhallStatus,
    organizer_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    projects: Table<ProjectRecord>,
    votes: Table<Vote>,
    townhalls: Table<TownhallRecord>,
    posts: Table<MirroredPost>,
}

impl Tables {
    fn owner(&self, user_id: i64) -> StoreResult<UserSummary> {
        self.users
            .rows
            .get(&user_id)
            .map(UserSummary::from)
            .ok_or(StoreError::NotFound)
    }

    fn project(&self, record: &ProjectRecord) -> StoreResult<Project> {
        Ok(Project {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            status: record.status,
            proposer_id: record.proposer_id,
            proposer: self.owner(record.proposer_id)?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    fn townhall(&self, record: &TownhallRecord) -> StoreResult<Townhall> {
        Ok(Townhall {
            id: record.id,
            title: record.title.clone(),
            description: record.description.clone(),
            scheduled_at: record.scheduled_at,
            zoom_link: record.zoom_link.clone(),
            status: record.status,
            organizer_id: record.organizer_id,
            organizer: self.owner(record.organizer_id)?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Posts in list order: newest `posted_at` first, then highest id
    fn posts_newest_first(&self) -> Vec<&MirroredPost> {
        let mut posts: Vec<&MirroredPost> = self.posts.rows.values().collect();
        posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Process-local storage with the same semantics as `PgStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.rows.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }
        if tables.users.rows.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }

        let now = Utc::now();
        let id = tables.users.allocate_id();
        let created = User {
            id,
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.rows.get(&id).cloned())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, project: NewProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        tables.owner(project.proposer_id)?;

        let now = Utc::now();
        let id = tables.projects.allocate_id();
        let record = ProjectRecord {
            id,
            title: project.title,
            description: project.description,
            status: ProjectStatus::default(),
            proposer_id: project.proposer_id,
            created_at: now,
            updated_at: now,
        };
        let created = tables.project(&record)?;
        tables.projects.rows.insert(id, record);
        Ok(created)
    }

    async fn list_projects(&self, filter: &ProjectFilter, page: Page) -> StoreResult<Paged<Project>> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&ProjectRecord> = tables
            .projects
            .rows
            .values()
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .filter(|p| filter.proposer_id.is_none_or(|id| p.proposer_id == id))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let projects = matching
            .into_iter()
            .map(|record| tables.project(record))
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(Paged::from_sorted(projects, page))
    }

    async fn get_project(&self, id: i64) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        tables
            .projects
            .rows
            .get(&id)
            .map(|record| tables.project(record))
            .transpose()
    }

    async fn update_project(&self, id: i64, changes: ProjectChanges) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        let record = tables.projects.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(title) = changes.title {
            record.title = title;
        }
        if let Some(description) = changes.description {
            record.description = description;
        }
        if let Some(status) = changes.status {
            record.status = status;
        }
        record.updated_at = Utc::now();

        let record = record.clone();
        tables.project(&record)
    }

    async fn delete_project(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.projects.rows.remove(&id).ok_or(StoreError::NotFound)?;
        tables.votes.rows.retain(|_, vote| vote.project_id != id);
        Ok(())
    }

    async fn cast_vote(
        &self,
        user_id: i64,
        project_id: i64,
        vote_type: VoteType,
    ) -> StoreResult<VoteOutcome> {
        let mut tables = self.tables.write().await;
        if !tables.projects.rows.contains_key(&project_id) || !tables.users.rows.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }

        let now = Utc::now();
        let existing = tables
            .votes
            .rows
            .values_mut()
            .find(|v| v.user_id == user_id && v.project_id == project_id);

        if let Some(vote) = existing {
            vote.vote_type = vote_type;
            vote.updated_at = now;
            return Ok(VoteOutcome {
                vote: vote.clone(),
                created: false,
            });
        }

        let id = tables.votes.allocate_id();
        let vote = Vote {
            id,
            user_id,
            project_id,
            vote_type,
            created_at: now,
            updated_at: now,
        };
        tables.votes.rows.insert(id, vote.clone());
        Ok(VoteOutcome {
            vote,
            created: true,
        })
    }

    async fn project_votes(&self, project_ids: &[i64]) -> StoreResult<Vec<ProjectVote>> {
        let tables = self.tables.read().await;

        tables
            .votes
            .rows
            .values()
            .filter(|v| project_ids.contains(&v.project_id))
            .map(|v| -> StoreResult<ProjectVote> {
                let voter = tables.users.rows.get(&v.user_id).ok_or(StoreError::NotFound)?;
                Ok(ProjectVote {
                    project_id: v.project_id,
                    vote_type: v.vote_type,
                    user: VoterSummary {
                        id: voter.id,
                        username: voter.username.clone(),
                    },
                })
            })
            .collect()
    }
}

#[async_trait]
impl TownhallStore for MemoryStore {
    async fn create_townhall(&self, townhall: NewTownhall) -> StoreResult<Townhall> {
        let mut tables = self.tables.write().await;
        tables.owner(townhall.organizer_id)?;

        let now = Utc::now();
        let id = tables.townhalls.allocate_id();
        let record = TownhallRecord {
            id,
            title: townhall.title,
            description: townhall.description,
            scheduled_at: townhall.scheduled_at,
            zoom_link: townhall.zoom_link,
            status: TownhallStatus::default(),
            organizer_id: townhall.organizer_id,
            created_at: now,
            updated_at: now,
        };
        let created = tables.townhall(&record)?;
        tables.townhalls.rows.insert(id, record);
        Ok(created)
    }

    async fn list_townhalls(&self, filter: &TownhallFilter, page: Page) -> StoreResult<Paged<Townhall>> {
        let tables = self.tables.read().await;

        let mut townhalls = tables
            .townhalls
            .rows
            .values()
            .map(|record| tables.townhall(record))
            .collect::<StoreResult<Vec<_>>>()?;
        townhalls.retain(|t| filter.matches(t));
        townhalls.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));

        Ok(Paged::from_sorted(townhalls, page))
    }

    async fn get_townhall(&self, id: i64) -> StoreResult<Option<Townhall>> {
        let tables = self.tables.read().await;
        tables
            .townhalls
            .rows
            .get(&id)
            .map(|record| tables.townhall(record))
            .transpose()
    }

    async fn update_townhall(&self, id: i64, changes: TownhallChanges) -> StoreResult<Townhall> {
        let mut tables = self.tables.write().await;
        let record = tables.townhalls.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(title) = changes.title {
            record.title = title;
        }
        if let Some(description) = changes.description {
            record.description = description;
        }
        if let Some(scheduled_at) = changes.scheduled_at {
            record.scheduled_at = scheduled_at;
        }
        if let Some(zoom_link) = changes.zoom_link {
            record.zoom_link = Some(zoom_link);
        }
        if let Some(status) = changes.status {
            record.status = status;
        }
        record.updated_at = Utc::now();

        let record = record.clone();
        tables.townhall(&record)
    }

    async fn delete_townhall(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.townhalls.rows.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl UpdateStore for MemoryStore {
    async fn find_post_by_external_id(&self, post_id: &str) -> StoreResult<Option<MirroredPost>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .rows
            .values()
            .find(|p| p.post_id == post_id)
            .cloned())
    }

    async fn insert_post(
        &self,
        post: NewMirroredPost,
        fetched_at: DateTime<Utc>,
    ) -> StoreResult<MirroredPost> {
        let mut tables = self.tables.write().await;
        if tables.posts.rows.values().any(|p| p.post_id == post.post_id) {
            return Err(StoreError::Conflict("x_updates_post_id_key".to_string()));
        }

        let id = tables.posts.allocate_id();
        let stored = MirroredPost {
            id,
            post_id: post.post_id,
            content: post.content,
            author: post.author,
            posted_at: post.posted_at,
            fetched_at,
        };
        tables.posts.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_posts(&self, filter: &UpdateFilter, page: Page) -> StoreResult<Paged<MirroredPost>> {
        let tables = self.tables.read().await;
        let matching: Vec<MirroredPost> = tables
            .posts_newest_first()
            .into_iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        Ok(Paged::from_sorted(matching, page))
    }

    async fn get_post(&self, id: i64) -> StoreResult<Option<MirroredPost>> {
        let tables = self.tables.read().await;
        Ok(tables.posts.rows.get(&id).cloned())
    }

    async fn post_ids_beyond(&self, retain: usize) -> StoreResult<Vec<i64>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts_newest_first()
            .into_iter()
            .skip(retain)
            .map(|p| p.id)
            .collect())
    }

    async fn delete_posts(&self, ids: &[i64]) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.rows.len();
        tables.posts.rows.retain(|id, _| !ids.contains(id));
        Ok((before - tables.posts.rows.len()) as u64)
    }
}
