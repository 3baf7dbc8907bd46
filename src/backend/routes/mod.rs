//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports
//! ├── router.rs       - Router assembly, health, docs, fallback, layers
//! └── api_routes.rs   - /api/auth, /api/projects, /api/townhalls, /api/x-updates
//! ```
//!
//! # Authentication
//!
//! Protected routes get `auth_middleware` as a route layer, which resolves the
//! bearer token to an `AuthenticatedUser` request extension. Admin-only routes
//! add `require_admin` inside it. Everything else is public.

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

pub use router::create_router;
