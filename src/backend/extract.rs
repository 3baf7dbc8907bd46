/**
 * Request Extractors
 *
 * Wrappers around axum's `Json`, `Query` and `Path` extractors that reject
 * with `ApiError` instead of axum's plain-text rejections, so malformed input
 * gets the same 400 envelope as a failed validation rule.
 *
 * - `ValidJson<T>` - deserialize the body, then run `T::validate()`
 * - `ValidQuery<T>` - same for the query string
 * - `IdPath` - a single positive integer path parameter
 *
 * The `normalize` submodule holds serde helpers that trim (and for emails,
 * lowercase) string fields during deserialization, before validation sees
 * them.
 */

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::backend::error::{ApiError, FieldError};

/// JSON body that has passed its validation rules
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                ApiError::bad_request(rejection.body_text())
            })?;

        value.validate().inspect_err(|e| {
            tracing::warn!("Request body failed validation: {}", e);
        })?;
        Ok(Self(value))
    }
}

/// Query string that has passed its validation rules
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::warn!("Rejected query string: {}", rejection.body_text());
                ApiError::bad_request(rejection.body_text())
            })?;

        value.validate().inspect_err(|e| {
            tracing::warn!("Query failed validation: {}", e);
        })?;
        Ok(Self(value))
    }
}

/// Positive integer `{id}` path parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

fn invalid_id() -> ApiError {
    ApiError::validation(vec![FieldError::new("id", "Invalid ID parameter")])
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;

        match raw.parse::<i64>() {
            Ok(id) if id >= 1 => Ok(Self(id)),
            _ => {
                tracing::warn!("Rejected path id: {:?}", raw);
                Err(invalid_id())
            }
        }
    }
}

/// Serde `deserialize_with` helpers applied to request fields
pub mod normalize {
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer};

    pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(value.trim().to_string())
    }

    pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.map(|v| v.trim().to_string()))
    }

    pub fn email<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(value.trim().to_lowercase())
    }

    /// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
    pub fn datetime_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(parsed.with_timezone(&Utc)));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|date| Some(date.and_time(NaiveTime::MIN).and_utc()))
            .map_err(|_| D::Error::custom(format!("invalid date: {raw}")))
    }
}
