//! Request types for `/api/townhalls`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::backend::extract::normalize;
use crate::backend::validation;
use crate::domain::{Page, TownhallFilter, TownhallStatus};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTownhallRequest {
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
    /// RFC 3339, strictly in the future
    #[validate(custom(function = "validation::in_future"))]
    pub scheduled_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "normalize::trimmed_opt")]
    #[validate(url(message = "Zoom link must be a valid URL"))]
    pub zoom_link: Option<String>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTownhallRequest {
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
    #[validate(custom(function = "validation::in_future"))]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "normalize::trimmed_opt")]
    #[validate(url(message = "Zoom link must be a valid URL"))]
    pub zoom_link: Option<String>,
    /// Applied only when the caller is an admin
    pub status: Option<TownhallStatus>,
}

/// `GET /api/townhalls` query string
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "check_range"))]
pub struct TownhallListQuery {
    /// One-based page number (default 1)
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 10)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    pub status: Option<TownhallStatus>,
    /// Only townhalls organized by this user id
    #[validate(range(min = 1, message = "Organizer must be a positive integer"))]
    pub organizer: Option<i64>,
    /// Earliest scheduled time, inclusive
    #[serde(default, deserialize_with = "normalize::datetime_opt")]
    pub from_date: Option<DateTime<Utc>>,
    /// Latest scheduled time, inclusive
    #[serde(default, deserialize_with = "normalize::datetime_opt")]
    pub to_date: Option<DateTime<Utc>>,
}

fn check_range(query: &TownhallListQuery) -> Result<(), ValidationError> {
    validation::date_range(query.from_date, query.to_date)
}

impl TownhallListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.limit)
    }

    pub fn filter(&self) -> TownhallFilter {
        TownhallFilter {
            status: self.status,
            organizer_id: self.organizer,
            from: self.from_date,
            to: self.to_date,
        }
    }
}
