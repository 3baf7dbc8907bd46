//! X Updates Module
//!
//! Mirrors recent posts matching a search query into local storage and serves
//! them read-only.
//!
//! # Module Structure
//!
//! ```text
//! updates/
//! ├── mod.rs      - Module exports and documentation
//! ├── feed.rs     - FeedSource trait and the X recent-search client
//! ├── service.rs  - UpdateSync cycle and the background timer
//! ├── types.rs    - Query and response types
//! └── handlers.rs - HTTP handlers
//! ```
//!
//! # Sync Flow
//!
//! The timer task (every `X_SYNC_INTERVAL_SECS`) and the admin refresh
//! endpoint both call `UpdateSync::run_cycle`: fetch, store unseen posts,
//! prune to the retention cap.

pub mod feed;
pub mod handlers;
pub mod service;
pub mod types;

pub use feed::{FeedError, FeedSource, XSearchFeed};
pub use handlers::{get_update, list_updates, refresh_updates};
pub use service::{spawn_sync_loop, SyncReport, UpdateSync, DEFAULT_RETENTION};
