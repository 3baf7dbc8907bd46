/**
 * Error Conversion
 *
 * The one place where handler failures become HTTP responses. Every error
 * body uses the same envelope as successful responses:
 *
 * ```json
 * {
 *   "status": "error",
 *   "message": "Validation failed",
 *   "errors": [{ "field": "title", "message": "..." }]
 * }
 * ```
 *
 * `errors` is omitted when empty. Internal errors are logged here with their
 * detail and reach the client as "Internal server error".
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::error::types::{ApiError, FieldError};

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `"error"`
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl From<&ApiError> for ErrorBody {
    fn from(error: &ApiError) -> Self {
        Self {
            status: "error".to_string(),
            message: error.message(),
            errors: error.field_errors().to_vec(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Internal(detail) => tracing::error!("Request failed: {}", detail),
            other => tracing::debug!("Request rejected with {}: {}", status, other),
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
