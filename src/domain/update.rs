/**
 * Mirrored X Posts
 *
 * Local copies of posts fetched from the X recent-search API. `post_id` is the
 * external id and the deduplication key; the store rejects a second row with
 * the same value.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow, ToSchema)]
pub struct MirroredPost {
    pub id: i64,
    /// External post id
    pub post_id: String,
    pub content: String,
    /// Author handle, `Unknown` when the feed did not resolve it
    pub author: String,
    pub posted_at: DateTime<Utc>,
    pub fetched_at: DateTime<Utc>,
}

/// Post as produced by a feed, before it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewMirroredPost {
    pub post_id: String,
    pub content: String,
    pub author: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Case-insensitive substring of the author handle
    pub author: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl UpdateFilter {
    pub fn matches(&self, post: &MirroredPost) -> bool {
        let author_matches = self.author.as_ref().is_none_or(|needle| {
            post.author.to_lowercase().contains(&needle.to_lowercase())
        });
        author_matches
            && self.from.is_none_or(|from| post.posted_at >= from)
            && self.to.is_none_or(|to| post.posted_at <= to)
    }
}
