//! Oluora - Civic Engagement Backend
//!
//! An HTTP API where residents register, propose community projects and vote
//! on them, schedule townhall meetings, and read a local mirror of recent
//! posts from X matching a configured search.
//!
//! # Module Structure
//!
//! - **`domain`** - Records, filters, pagination and vote tallies; no I/O
//! - **`backend`** - Axum server, persistence, auth and the X update sync
//!
//! # Usage
//!
//! ```rust,no_run
//! use oluora::backend::{create_app, AppConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! let served = axum::serve(listener, app.router.clone()).await;
//! app.stop_sync();
//! served?;
//! # Ok(())
//! # }
//! ```

/// Domain types shared by the store and the handlers
pub mod domain;

/// Backend server-side code
pub mod backend;
