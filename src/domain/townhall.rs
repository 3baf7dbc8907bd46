//! Scheduled townhall meetings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "townhall_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TownhallStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Townhall {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub zoom_link: Option<String>,
    pub status: TownhallStatus,
    pub organizer_id: i64,
    pub organizer: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTownhall {
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub zoom_link: Option<String>,
    pub organizer_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct TownhallChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub zoom_link: Option<String>,
    pub status: Option<TownhallStatus>,
}

/// List filter; the date bounds are inclusive on `scheduled_at`
#[derive(Debug, Clone, Default)]
pub struct TownhallFilter {
    pub status: Option<TownhallStatus>,
    pub organizer_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TownhallFilter {
    pub fn matches(&self, townhall: &Townhall) -> bool {
        self.status.is_none_or(|s| townhall.status == s)
            && self.organizer_id.is_none_or(|id| townhall.organizer_id == id)
            && self.from.is_none_or(|from| townhall.scheduled_at >= from)
            && self.to.is_none_or(|to| townhall.scheduled_at <= to)
    }
}
