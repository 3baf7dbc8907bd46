//! Backend Module
//!
//! All server-side code: the Axum HTTP server, its persistence layer and the
//! background X update sync.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, app assembly
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Password hashing, JWT issuing and the auth handlers
//! - **`middleware`** - Bearer authentication and the admin gate
//! - **`projects`** - Project proposals and votes
//! - **`townhalls`** - Townhall meetings
//! - **`updates`** - X feed client, sync service and handlers
//! - **`store`** - Persistence traits with PostgreSQL and in-memory backends
//! - **`policy`** - Ownership and role rules for mutations
//! - **`extract`** - Validating JSON, query and path extractors
//! - **`validation`** - Field rules shared by the request types
//! - **`response`** - Success envelope
//! - **`error`** - `ApiError` and its HTTP translation
//! - **`docs`** - OpenAPI document
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs         - Server binary
//! ├── server/         - Config, state, init
//! ├── routes/         - Route configuration
//! ├── auth/           - Credentials, sessions, handlers
//! ├── middleware/     - Request middleware
//! ├── projects/       - Project handlers and request types
//! ├── townhalls/      - Townhall handlers and request types
//! ├── updates/        - X feed, sync service, handlers
//! ├── store/          - Store traits, PostgreSQL and memory backends
//! └── error/          - Error types
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<_, ApiError>`. Store, credential and extractor
//! failures convert into `ApiError`, which renders the error envelope.

/// Authentication and user management
pub mod auth;

/// OpenAPI document
pub mod docs;

/// Backend error types
pub mod error;

/// Validating extractors
pub mod extract;

/// Middleware for request processing
pub mod middleware;

/// Ownership and role rules
pub mod policy;

/// Project proposals and votes
pub mod projects;

/// Success envelope
pub mod response;

/// Route configuration
pub mod routes;

/// Server setup and configuration
pub mod server;

/// Persistence
pub mod store;

/// Townhall meetings
pub mod townhalls;

/// Mirrored X updates
pub mod updates;

/// Shared field validators
pub mod validation;

pub use error::ApiError;
pub use server::{create_app, AppConfig, AppState};
