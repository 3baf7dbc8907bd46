//! Database migration tests
//!
//! Tests to ensure migrations run correctly and the schema is usable

use crate::common::{run_migrations, TestDatabase};

#[tokio::test]
async fn test_migrations_create_every_table() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    for table in ["users", "projects", "votes", "townhalls", "x_updates"] {
        let result = sqlx::query(&format!("SELECT 1 FROM {table} LIMIT 1"))
            .execute(db.pool())
            .await;
        assert!(result.is_ok(), "{table} table should exist");
    }

    db.cleanup().await;
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };

    let result = run_migrations(db.pool()).await;
    assert!(result.is_ok(), "Re-running migrations should be a no-op");

    db.cleanup().await;
}
