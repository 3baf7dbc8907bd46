/**
 * PostgreSQL Store
 *
 * `PgStore` implements the storage traits with `sqlx` against the schema in
 * `migrations/`. Queries are runtime-checked (`query_as` with bound
 * parameters) so the crate builds without a live database.
 *
 * # Filters
 *
 * Optional list filters are bound as nullable parameters and applied with the
 * `($n IS NULL OR column = $n)` pattern, so one statement covers every filter
 * combination.
 *
 * # Joined Rows
 *
 * Projects and townhalls are always read together with their owner's
 * username and email. Mutations use a CTE around `INSERT`/`UPDATE ...
 * RETURNING *` so the joined shape comes back in a single round trip.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::backend::store::{
    ProjectStore, StoreError, StoreResult, TownhallStore, UpdateStore, UserStore,
};
use crate::domain::{
    MirroredPost, NewMirroredPost, NewProject, NewTownhall, NewUser, Page, Paged, Project,
    ProjectChanges, ProjectFilter, ProjectStatus, ProjectVote, Townhall, TownhallChanges,
    TownhallFilter, TownhallStatus, UpdateFilter, User, UserSummary, Vote, VoteOutcome, VoteType,
    VoterSummary,
};

const USER_COLUMNS: &str = "id, email, username, password_hash, role, created_at, updated_at";

const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.status, p.proposer_id, \
     p.created_at, p.updated_at, u.username AS owner_username, u.email AS owner_email";

const PROJECT_FILTER: &str = "($1::project_status IS NULL OR p.status = $1) \
     AND ($2::bigint IS NULL OR p.proposer_id = $2)";

const TOWNHALL_COLUMNS: &str = "t.id, t.title, t.description, t.scheduled_at, t.zoom_link, \
     t.status, t.organizer_id, t.created_at, t.updated_at, \
     u.username AS owner_username, u.email AS owner_email";

const TOWNHALL_FILTER: &str = "($1::townhall_status IS NULL OR t.status = $1) \
     AND ($2::bigint IS NULL OR t.organizer_id = $2) \
     AND ($3::timestamptz IS NULL OR t.scheduled_at >= $3) \
     AND ($4::timestamptz IS NULL OR t.scheduled_at <= $4)";

const POST_COLUMNS: &str = "id, post_id, content, author, posted_at, fetched_at";

const POST_FILTER: &str = "($1::text IS NULL OR author ILIKE '%' || $1 || '%') \
     AND ($2::timestamptz IS NULL OR posted_at >= $2) \
     AND ($3::timestamptz IS NULL OR posted_at <= $3)";

/// Project joined with its proposer
#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    title: String,
    description: String,
    status: ProjectStatus,
    proposer_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: String,
    owner_email: String,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            proposer_id: row.proposer_id,
            proposer: UserSummary {
                id: row.proposer_id,
                username: row.owner_username,
                email: row.owner_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Townhall joined with its organizer
#[derive(Debug, sqlx::FromRow)]
struct TownhallRow {
    id: i64,
    title: String,
    description: String,
    scheduled_at: DateTime<Utc>,
    zoom_link: Option<String>,
    status: TownhallStatus,
    organizer_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: String,
    owner_email: String,
}

impl From<TownhallRow> for Townhall {
    fn from(row: TownhallRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            scheduled_at: row.scheduled_at,
            zoom_link: row.zoom_link,
            status: row.status,
            organizer_id: row.organizer_id,
            organizer: UserSummary {
                id: row.organizer_id,
                username: row.owner_username,
                email: row.owner_email,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CastVoteRow {
    #[sqlx(flatten)]
    vote: Vote,
    inserted: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectVoteRow {
    project_id: i64,
    vote_type: VoteType,
    user_id: i64,
    username: String,
}

impl From<ProjectVoteRow> for ProjectVote {
    fn from(row: ProjectVoteRow) -> Self {
        Self {
            project_id: row.project_id,
            vote_type: row.vote_type,
            user: VoterSummary {
                id: row.user_id,
                username: row.username,
            },
        }
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside `ILIKE`
fn like_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Storage backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (email, username, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create_project(&self, project: NewProject) -> StoreResult<Project> {
        let sql = format!(
            "WITH p AS ( \
                INSERT INTO projects (title, description, proposer_id) \
                VALUES ($1, $2, $3) RETURNING * \
             ) \
             SELECT {PROJECT_COLUMNS} FROM p JOIN users u ON u.id = p.proposer_id"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(&project.title)
            .bind(&project.description)
            .bind(project.proposer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_projects(&self, filter: &ProjectFilter, page: Page) -> StoreResult<Paged<Project>> {
        let count_sql = format!("SELECT COUNT(*) FROM projects p WHERE {PROJECT_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.status)
            .bind(filter.proposer_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p JOIN users u ON u.id = p.proposer_id \
             WHERE {PROJECT_FILTER} \
             ORDER BY p.created_at DESC, p.id DESC \
             LIMIT $3 OFFSET $4"
        );
        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(filter.status)
            .bind(filter.proposer_id)
            .bind(i64::from(page.limit))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Paged {
            items: rows.into_iter().map(Project::from).collect(),
            total: to_total(total),
        })
    }

    async fn get_project(&self, id: i64) -> StoreResult<Option<Project>> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p JOIN users u ON u.id = p.proposer_id \
             WHERE p.id = $1"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Project::from))
    }

    async fn update_project(&self, id: i64, changes: ProjectChanges) -> StoreResult<Project> {
        let sql = format!(
            "WITH p AS ( \
                UPDATE projects SET \
                    title = COALESCE($2, title), \
                    description = COALESCE($3, description), \
                    status = COALESCE($4, status), \
                    updated_at = now() \
                WHERE id = $1 RETURNING * \
             ) \
             SELECT {PROJECT_COLUMNS} FROM p JOIN users u ON u.id = p.proposer_id"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_project(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn cast_vote(
        &self,
        user_id: i64,
        project_id: i64,
        vote_type: VoteType,
    ) -> StoreResult<VoteOutcome> {
        // xmax is zero only for rows created by this statement
        let row = sqlx::query_as::<_, CastVoteRow>(
            r#"
            INSERT INTO votes (user_id, project_id, vote_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, project_id)
            DO UPDATE SET vote_type = EXCLUDED.vote_type, updated_at = now()
            RETURNING id, user_id, project_id, vote_type, created_at, updated_at,
                      (xmax = 0) AS inserted
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .bind(vote_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(VoteOutcome {
            vote: row.vote,
            created: row.inserted,
        })
    }

    async fn project_votes(&self, project_ids: &[i64]) -> StoreResult<Vec<ProjectVote>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProjectVoteRow>(
            r#"
            SELECT v.project_id, v.vote_type, u.id AS user_id, u.username
            FROM votes v
            JOIN users u ON u.id = v.user_id
            WHERE v.project_id = ANY($1)
            ORDER BY v.created_at, v.id
            "#,
        )
        .bind(project_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProjectVote::from).collect())
    }
}

#[async_trait]
impl TownhallStore for PgStore {
    async fn create_townhall(&self, townhall: NewTownhall) -> StoreResult<Townhall> {
        let sql = format!(
            "WITH t AS ( \
                INSERT INTO townhalls (title, description, scheduled_at, zoom_link, organizer_id) \
                VALUES ($1, $2, $3, $4, $5) RETURNING * \
             ) \
             SELECT {TOWNHALL_COLUMNS} FROM t JOIN users u ON u.id = t.organizer_id"
        );
        let row = sqlx::query_as::<_, TownhallRow>(&sql)
            .bind(&townhall.title)
            .bind(&townhall.description)
            .bind(townhall.scheduled_at)
            .bind(&townhall.zoom_link)
            .bind(townhall.organizer_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_townhalls(&self, filter: &TownhallFilter, page: Page) -> StoreResult<Paged<Townhall>> {
        let count_sql = format!("SELECT COUNT(*) FROM townhalls t WHERE {TOWNHALL_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.status)
            .bind(filter.organizer_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {TOWNHALL_COLUMNS} FROM townhalls t JOIN users u ON u.id = t.organizer_id \
             WHERE {TOWNHALL_FILTER} \
             ORDER BY t.scheduled_at ASC, t.id ASC \
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TownhallRow>(&sql)
            .bind(filter.status)
            .bind(filter.organizer_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(i64::from(page.limit))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Paged {
            items: rows.into_iter().map(Townhall::from).collect(),
            total: to_total(total),
        })
    }

    async fn get_townhall(&self, id: i64) -> StoreResult<Option<Townhall>> {
        let sql = format!(
            "SELECT {TOWNHALL_COLUMNS} FROM townhalls t JOIN users u ON u.id = t.organizer_id \
             WHERE t.id = $1"
        );
        let row = sqlx::query_as::<_, TownhallRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Townhall::from))
    }

    async fn update_townhall(&self, id: i64, changes: TownhallChanges) -> StoreResult<Townhall> {
        let sql = format!(
            "WITH t AS ( \
                UPDATE townhalls SET \
                    title = COALESCE($2, title), \
                    description = COALESCE($3, description), \
                    scheduled_at = COALESCE($4, scheduled_at), \
                    zoom_link = COALESCE($5, zoom_link), \
                    status = COALESCE($6, status), \
                    updated_at = now() \
                WHERE id = $1 RETURNING * \
             ) \
             SELECT {TOWNHALL_COLUMNS} FROM t JOIN users u ON u.id = t.organizer_id"
        );
        let row = sqlx::query_as::<_, TownhallRow>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.scheduled_at)
            .bind(changes.zoom_link)
            .bind(changes.status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_townhall(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM townhalls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UpdateStore for PgStore {
    async fn find_post_by_external_id(&self, post_id: &str) -> StoreResult<Option<MirroredPost>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM x_updates WHERE post_id = $1");
        let post = sqlx::query_as::<_, MirroredPost>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn insert_post(
        &self,
        post: NewMirroredPost,
        fetched_at: DateTime<Utc>,
    ) -> StoreResult<MirroredPost> {
        let sql = format!(
            "INSERT INTO x_updates (post_id, content, author, posted_at, fetched_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {POST_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, MirroredPost>(&sql)
            .bind(&post.post_id)
            .bind(&post.content)
            .bind(&post.author)
            .bind(post.posted_at)
            .bind(fetched_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn list_posts(&self, filter: &UpdateFilter, page: Page) -> StoreResult<Paged<MirroredPost>> {
        let author = filter.author.as_deref().map(like_literal);

        let count_sql = format!("SELECT COUNT(*) FROM x_updates WHERE {POST_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(&author)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {POST_COLUMNS} FROM x_updates WHERE {POST_FILTER} \
             ORDER BY posted_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        let items = sqlx::query_as::<_, MirroredPost>(&sql)
            .bind(&author)
            .bind(filter.from)
            .bind(filter.to)
            .bind(i64::from(page.limit))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Paged {
            items,
            total: to_total(total),
        })
    }

    async fn get_post(&self, id: i64) -> StoreResult<Option<MirroredPost>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM x_updates WHERE id = $1");
        let post = sqlx::query_as::<_, MirroredPost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    async fn post_ids_beyond(&self, retain: usize) -> StoreResult<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM x_updates ORDER BY posted_at DESC, id DESC OFFSET $1",
        )
        .bind(i64::try_from(retain).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn delete_posts(&self, ids: &[i64]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM x_updates WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
