//! Router-level behaviour: health, docs, fallback

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;

use crate::common::{assert_error, assert_success, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;

    assert_success(&response, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new();

    let response = app.get("/api/nothing-here", None).await;

    assert_error(&response, StatusCode::NOT_FOUND, "Route not found");
}

#[tokio::test]
async fn test_unsupported_method_gets_error_envelope() {
    let app = TestApp::new();

    let response = app.get("/api/x-updates/refresh", None).await;
    assert_error(&response, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");

    let response = app
        .request(Method::PATCH, "/api/projects/1", None, None)
        .await;
    assert_error(&response, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
}

#[tokio::test]
async fn test_openapi_document_uses_configured_server() {
    let app = TestApp::new();

    let response = app.get("/api-docs/openapi.json", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["servers"][0]["url"], "http://test.local/api");
    assert!(response.body["paths"]["/api/projects/{id}/vote"].is_object());
    assert!(response.body["components"]["securitySchemes"]["bearerAuth"].is_object());
}
