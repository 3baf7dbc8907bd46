//! Authentication Module
//!
//! This module handles user authentication, registration, and session
//! management.
//!
//! # Architecture
//!
//! - **`credentials`** - bcrypt password hashing
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Authentication Flow
//!
//! 1. **Register**: email, username, password → user created → JWT returned
//! 2. **Login**: email, password → credentials verified → JWT returned
//! 3. **Me**: JWT → verified by middleware → user info returned
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt on the blocking pool
//! - Tokens are HS256 JWTs with a configurable lifetime (default 7 days)
//! - Invalid credentials return 401 without saying which part was wrong

/// Password hashing
pub mod credentials;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use credentials::{CredentialError, PasswordHasher};
pub use handlers::{get_me, login, register, AuthPayload, LoginRequest, RegisterRequest};
pub use sessions::{Claims, TokenIssuer, TokenRejection};
