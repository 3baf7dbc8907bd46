//! Request and response types for `/api/x-updates`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::backend::extract::normalize;
use crate::backend::validation;
use crate::domain::{Page, UpdateFilter};

/// `GET /api/x-updates` query string
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "check_range"))]
pub struct UpdateListQuery {
    /// One-based page number (default 1)
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: Option<u32>,
    /// Page size, 1 to 100 (default 10)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    /// Case-insensitive substring of the author handle
    #[serde(default, deserialize_with = "normalize::trimmed_opt")]
    #[validate(length(min = 1, max = 100, message = "Author must be between 1 and 100 characters"))]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "normalize::datetime_opt")]
    pub from_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "normalize::datetime_opt")]
    pub to_date: Option<DateTime<Utc>>,
}

fn check_range(query: &UpdateListQuery) -> Result<(), ValidationError> {
    validation::date_range(query.from_date, query.to_date)
}

impl UpdateListQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.limit)
    }

    pub fn filter(&self) -> UpdateFilter {
        UpdateFilter {
            author: self.author.clone(),
            from: self.from_date,
            to: self.to_date,
        }
    }
}

/// Result of a manual refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RefreshSummary {
    pub new_updates_count: usize,
}
