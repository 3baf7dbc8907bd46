//! Server Module
//!
//! Everything needed to turn an [`AppConfig`] into a running router.
//!
//! # Architecture
//!
//! - **`config`** - Environment configuration and database loading
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`init`** - Application assembly, admin bootstrap and sync startup
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `AppConfig::from_env`
//! 2. **Store Selection**: PostgreSQL when `DATABASE_URL` is set, otherwise
//!    the in-memory store
//! 3. **State Creation**: token issuer, password hasher, update sync
//! 4. **Background Tasks**: the periodic X update sync
//! 5. **Router Creation**: all routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use oluora::backend::server::{create_app, AppConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{AdminSeed, AppConfig, ConfigError};
pub use init::{build_state, create_app, seed_admin, App};
pub use state::AppState;
