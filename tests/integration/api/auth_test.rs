//! Authentication API integration tests
//!
//! Tests for registration, login and the current-user endpoint.

use std::time::Duration;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use oluora::backend::auth::TokenIssuer;
use oluora::backend::store::UserStore;

use crate::common::{
    assert_error, assert_success, field_messages, register_user, TestApp, TEST_PASSWORD,
};

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "  Ada@Example.COM ",
                "username": "ada_l",
                "password": "Secret12"
            }),
        )
        .await;

    assert_success(&response, StatusCode::CREATED);
    assert_eq!(response.body["message"], "User registered successfully");
    let user = &response.body["data"]["user"];
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["username"], "ada_l");
    assert_eq!(user["role"], "USER");
    assert!(user.get("password_hash").is_none());
    assert!(response.body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    register_user(&app, "first").await;

    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "FIRST@example.com",
                "username": "second",
                "password": TEST_PASSWORD
            }),
        )
        .await;

    assert_error(
        &response,
        StatusCode::CONFLICT,
        "User with this email already exists",
    );
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::new();
    register_user(&app, "taken").await;

    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "other@example.com",
                "username": "taken",
                "password": TEST_PASSWORD
            }),
        )
        .await;

    assert_error(
        &response,
        StatusCode::CONFLICT,
        "User with this username already exists",
    );
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "not-an-email",
                "username": "no spaces!",
                "password": "short"
            }),
        )
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Validation failed");
    assert_eq!(
        field_messages(&response, "email"),
        vec!["Please provide a valid email address"]
    );
    assert!(!field_messages(&response, "username").is_empty());
    assert!(!field_messages(&response, "password").is_empty());
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = TestApp::new();

    let response = app
        .request(
            axum::http::Method::POST,
            "/api/auth/register",
            None,
            Some(json!("just a string")),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "error");
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let user = register_user(&app, "login_ok").await;

    let response = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": user.email.to_uppercase(), "password": user.password }),
        )
        .await;

    assert_success(&response, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful");
    assert_eq!(response.body["data"]["user"]["id"], user.id);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    let user = register_user(&app, "login_bad").await;

    let wrong_password = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": user.email, "password": "Wrong123" }),
        )
        .await;
    let unknown_email = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }),
        )
        .await;

    assert_error(&wrong_password, StatusCode::UNAUTHORIZED, "Invalid credentials");
    assert_error(&unknown_email, StatusCode::UNAUTHORIZED, "Invalid credentials");
}

#[tokio::test]
async fn test_login_requires_password() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "someone@example.com", "password": "" }),
        )
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Validation failed");
    assert_eq!(field_messages(&response, "password"), vec!["Password is required"]);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = TestApp::new();
    let user = register_user(&app, "whoami").await;

    let response = app.get("/api/auth/me", Some(&user.token)).await;

    assert_success(&response, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "whoami");
    assert_eq!(response.body["data"]["email"], "whoami@example.com");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::new();

    let response = app.get("/api/auth/me", None).await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Access token required");
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = TestApp::new();

    let response = app.get("/api/auth/me", Some("not.a.jwt")).await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid token");
}

#[tokio::test]
async fn test_token_signed_with_another_secret_is_rejected() {
    let app = TestApp::new();
    let user = register_user(&app, "crossover").await;

    let stored = app.state.store.get_user(user.id).await.unwrap().unwrap();
    let foreign = TokenIssuer::new("a-different-secret", Duration::from_secs(60));
    let token = foreign.issue(&stored).unwrap();

    let response = app.get("/api/auth/me", Some(&token)).await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid token");
}
