//! Postgres integration tests
//!
//! Skipped unless `DATABASE_URL` points at a reachable Postgres server.

mod migrations_test;
mod pg_store_test;
