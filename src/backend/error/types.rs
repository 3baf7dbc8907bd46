/**
 * API Error Types
 *
 * `ApiError` is the single error type returned by handlers, extractors and
 * middleware. Each variant maps to one HTTP status; `conversion.rs` turns it
 * into the JSON error envelope.
 *
 * # Error Categories
 *
 * - `Validation` (400) - malformed body, query or path, or a failed field rule
 * - `Unauthorized` (401) - missing, invalid or expired bearer token; bad login
 * - `Forbidden` (403) - caller is neither the owner nor an admin
 * - `NotFound` (404) - resource or route does not exist
 * - `MethodNotAllowed` (405) - known path, unsupported method
 * - `Conflict` (409) - uniqueness violated (email, username, external post id)
 * - `Internal` (500) - store, hashing or signing failure; detail is logged only
 *
 * Persistence errors convert through `From<StoreError>`, so handlers can use
 * `?` on store calls directly.
 */

use std::borrow::Cow;

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::backend::auth::credentials::CredentialError;
use crate::backend::store::StoreError;

/// Field-level validation message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Input rejected before reaching the controller
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    Conflict(String),

    /// The string is for the logs; clients only see a generic message
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure with per-field messages
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation {
            message: "Validation failed".to_string(),
            errors,
        }
    }

    /// Validation failure with a single message and no field list
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// The permission error shared by every ownership check
    pub fn forbidden() -> Self {
        Self::Forbidden("Insufficient permissions".to_string())
    }

    /// `resource` is the display name, e.g. `"Project"`
    pub fn not_found(resource: &str) -> Self {
        Self::NotFound(format!("{resource} not found"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients
    pub fn message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Struct-level rule failures land under this key
const SCHEMA_KEY: &str = "__all__";

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut message = None;
        let mut fields = Vec::new();

        for (field, failures) in errors.field_errors() {
            for failure in failures.iter() {
                let text = failure
                    .message
                    .clone()
                    .unwrap_or_else(|| Cow::Owned(format!("Invalid value ({})", failure.code)))
                    .into_owned();
                if field.as_ref() == SCHEMA_KEY {
                    message.get_or_insert(text);
                } else {
                    fields.push(FieldError::new(field.to_string(), text));
                }
            }
        }
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        Self::Validation {
            message: message.unwrap_or_else(|| "Validation failed".to_string()),
            errors: fields,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => Self::conflict("Resource already exists"),
            StoreError::NotFound => Self::NotFound("Resource not found".to_string()),
            StoreError::Database(e) => Self::internal(format!("database error: {e}")),
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        Self::internal(err.to_string())
    }
}
