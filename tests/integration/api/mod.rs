//! API integration tests
//!
//! Integration tests for all API endpoints

mod auth_test;
mod projects_test;
mod router_test;
