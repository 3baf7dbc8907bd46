//! Authentication test helpers
//!
//! Users are registered through the HTTP API so their tokens come from the
//! same path real clients use. Admins cannot register, so they are seeded
//! the way startup does it and logged in.

use serde_json::json;

use oluora::backend::server::{seed_admin, AdminSeed};

use super::app::TestApp;

/// Registered user and their bearer token
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password: String,
    pub token: String,
}

pub const TEST_PASSWORD: &str = "Password123";

/// Register `username` with `{username}@example.com`
pub async fn register_user(app: &TestApp, username: &str) -> TestUser {
    let email = format!("{username}@example.com");
    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": email,
                "username": username,
                "password": TEST_PASSWORD,
            }),
        )
        .await;
    assert_eq!(response.status, 201, "register {username}: {}", response.body);

    TestUser {
        id: response.body["data"]["user"]["id"].as_i64().unwrap(),
        email,
        username: username.to_string(),
        password: TEST_PASSWORD.to_string(),
        token: response.body["data"]["token"].as_str().unwrap().to_string(),
    }
}

/// Seed an admin account and log it in
pub async fn create_admin(app: &TestApp) -> TestUser {
    let seed = AdminSeed {
        email: "admin@example.com".to_string(),
        username: "admin".to_string(),
        password: "Admin1234".to_string(),
    };
    seed_admin(&app.state, &seed).await.unwrap();

    let response = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": seed.email, "password": seed.password }),
        )
        .await;
    assert_eq!(response.status, 200, "admin login: {}", response.body);

    TestUser {
        id: response.body["data"]["user"]["id"].as_i64().unwrap(),
        email: seed.email,
        username: seed.username,
        password: seed.password,
        token: response.body["data"]["token"].as_str().unwrap().to_string(),
    }
}
