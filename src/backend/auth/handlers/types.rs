/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by authentication
 * handlers. Emails are trimmed and lowercased during deserialization, before
 * validation and lookup.
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::backend::extract::normalize;
use crate::backend::validation;
use crate::domain::UserView;

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "normalize::email")]
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// 3-30 characters: letters, digits, underscore
    #[validate(custom(function = "validation::username"))]
    pub username: String,
    /// At least 6 characters with lowercase, uppercase and a digit
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        custom(function = "validation::password_strength")
    )]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(deserialize_with = "normalize::email")]
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthPayload {
    pub user: UserView,
    /// Bearer token for the `Authorization` header
    pub token: String,
}
