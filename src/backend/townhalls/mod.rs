//! Townhalls Module
//!
//! Scheduled public meetings.
//!
//! # Module Structure
//!
//! ```text
//! townhalls/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Request and query types
//! └── handlers.rs - HTTP handlers
//! ```

pub mod handlers;
pub mod types;

pub use handlers::{
    create_townhall, delete_townhall, get_townhall, list_townhalls, update_townhall,
};
