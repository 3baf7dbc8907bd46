//! Common test utilities and helpers
//!
//! - An app builder over the in-memory store with a scripted X feed
//! - Authentication helpers for registering users and minting admin tokens
//! - Assertions on the JSON envelope
//! - Per-test Postgres schemas for the `PgStore` tests

pub mod app;
pub mod auth_helpers;

pub use app::*;
pub use assertions::*;
pub use auth_helpers::*;
pub use database::*;
