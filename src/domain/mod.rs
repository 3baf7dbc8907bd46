//! Domain Types
//!
//! Records and value types shared by the HTTP handlers, the persistence layer
//! and the update-sync service.
//!
//! # Module Structure
//!
//! ```text
//! domain/
//! ├── mod.rs        - Module exports
//! ├── user.rs       - Users, roles and public user views
//! ├── project.rs    - Community project proposals
//! ├── vote.rs       - Votes and the two-bucket vote tally
//! ├── townhall.rs   - Scheduled townhall meetings
//! ├── update.rs     - Mirrored X posts
//! └── pagination.rs - Page requests and response metadata
//! ```
//!
//! Enumerations map to PostgreSQL enum types through `sqlx::Type` and
//! serialize in SCREAMING_SNAKE_CASE on the wire (`PROPOSED`, `UPVOTE`, ...).

pub mod pagination;
pub mod project;
pub mod townhall;
pub mod update;
pub mod user;
pub mod vote;

pub use pagination::{Page, PageMeta, Paged};
pub use project::{NewProject, Project, ProjectChanges, ProjectDetail, ProjectFilter, ProjectListing, ProjectStatus};
pub use townhall::{NewTownhall, Townhall, TownhallChanges, TownhallFilter, TownhallStatus};
pub use update::{MirroredPost, NewMirroredPost, UpdateFilter};
pub use user::{NewUser, Role, User, UserSummary, UserView, VoterSummary};
pub use vote::{ProjectVote, ProjectVotes, Vote, VoteOutcome, VoteTally, VoteType};
