//! Projects Module
//!
//! Community project proposals and voting.
//!
//! # Module Structure
//!
//! ```text
//! projects/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Request and query types
//! └── handlers.rs - HTTP handlers
//! ```

pub mod handlers;
pub mod types;

pub use handlers::{
    create_project, delete_project, get_project, list_projects, project_votes, update_project,
    vote_on_project,
};
