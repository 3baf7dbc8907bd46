//! Project and vote API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    assert_error, assert_success, create_admin, field_messages, register_user, TestApp,
};

const DESCRIPTION: &str = "Resurface the market road and add proper drainage on both sides";

async fn create_project(app: &TestApp, token: &str, title: &str) -> i64 {
    let response = app
        .post(
            "/api/projects",
            Some(token),
            json!({ "title": title, "description": DESCRIPTION }),
        )
        .await;
    assert_success(&response, StatusCode::CREATED);
    response.body["data"]["id"].as_i64().unwrap()
}

async fn vote(app: &TestApp, token: &str, id: i64, vote_type: &str) -> crate::common::TestResponse {
    app.post(
        &format!("/api/projects/{id}/vote"),
        Some(token),
        json!({ "vote_type": vote_type }),
    )
    .await
}

#[tokio::test]
async fn test_projects_require_authentication() {
    let app = TestApp::new();

    for response in [
        app.get("/api/projects", None).await,
        app.get("/api/projects/1", None).await,
        app.post("/api/projects", None, json!({})).await,
        app.delete("/api/projects/1", None).await,
    ] {
        assert_error(&response, StatusCode::UNAUTHORIZED, "Access token required");
    }
}

#[tokio::test]
async fn test_create_project() {
    let app = TestApp::new();
    let user = register_user(&app, "proposer").await;

    let response = app
        .post(
            "/api/projects",
            Some(&user.token),
            json!({ "title": "  Market road repair  ", "description": DESCRIPTION }),
        )
        .await;

    assert_success(&response, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Project created successfully");
    let project = &response.body["data"];
    assert_eq!(project["title"], "Market road repair");
    assert_eq!(project["status"], "PROPOSED");
    assert_eq!(project["proposer_id"], user.id);
    assert_eq!(project["proposer"]["username"], "proposer");
}

#[tokio::test]
async fn test_create_project_validation() {
    let app = TestApp::new();
    let user = register_user(&app, "terse").await;

    let response = app
        .post(
            "/api/projects",
            Some(&user.token),
            json!({ "title": "Road", "description": "Too short" }),
        )
        .await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Validation failed");
    assert_eq!(
        field_messages(&response, "title"),
        vec!["Title must be between 5 and 200 characters"]
    );
    assert_eq!(
        field_messages(&response, "description"),
        vec!["Description must be between 20 and 2000 characters"]
    );
}

#[tokio::test]
async fn test_list_projects_with_vote_counts_and_meta() {
    let app = TestApp::new();
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;

    let first = create_project(&app, &alice.token, "Borehole for Umuahia ward").await;
    let second = create_project(&app, &alice.token, "Streetlights on Aba road").await;
    let third = create_project(&app, &bob.token, "Library renovation fund").await;

    vote(&app, &alice.token, first, "UPVOTE").await;
    vote(&app, &bob.token, first, "DOWNVOTE").await;
    vote(&app, &bob.token, second, "UPVOTE").await;

    let response = app.get("/api/projects?limit=2", Some(&alice.token)).await;
    assert_success(&response, StatusCode::OK);
    assert_eq!(
        response.body["meta"],
        json!({ "page": 1, "limit": 2, "total": 3, "pages": 2 })
    );

    // newest first
    let ids: Vec<i64> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second]);
    assert_eq!(
        response.body["data"][1]["vote_counts"],
        json!({ "upvotes": 1, "downvotes": 0, "total": 1 })
    );

    let page_two = app.get("/api/projects?limit=2&page=2", Some(&alice.token)).await;
    assert_eq!(page_two.body["data"][0]["id"], first);
    assert_eq!(
        page_two.body["data"][0]["vote_counts"],
        json!({ "upvotes": 1, "downvotes": 1, "total": 2 })
    );
}

#[tokio::test]
async fn test_list_projects_filters() {
    let app = TestApp::new();
    let alice = register_user(&app, "alice").await;
    let bob = register_user(&app, "bob").await;
    let admin = create_admin(&app).await;

    let approved = create_project(&app, &alice.token, "Clinic extension project").await;
    create_project(&app, &bob.token, "Football pitch upgrade").await;
    app.put(
        &format!("/api/projects/{approved}"),
        Some(&admin.token),
        json!({ "status": "APPROVED" }),
    )
    .await;

    let by_status = app
        .get("/api/projects?status=APPROVED", Some(&bob.token))
        .await;
    assert_eq!(by_status.body["meta"]["total"], 1);
    assert_eq!(by_status.body["data"][0]["id"], approved);

    let by_proposer = app
        .get(&format!("/api/projects?proposer={}", bob.id), Some(&bob.token))
        .await;
    assert_eq!(by_proposer.body["meta"]["total"], 1);
    assert_eq!(by_proposer.body["data"][0]["proposer_id"], bob.id);
}

#[tokio::test]
async fn test_list_projects_rejects_bad_paging() {
    let app = TestApp::new();
    let user = register_user(&app, "pager").await;

    let zero_page = app.get("/api/projects?page=0", Some(&user.token)).await;
    assert_error(&zero_page, StatusCode::BAD_REQUEST, "Validation failed");
    assert_eq!(
        field_messages(&zero_page, "page"),
        vec!["Page must be a positive integer"]
    );

    let huge_limit = app.get("/api/projects?limit=101", Some(&user.token)).await;
    assert_eq!(
        field_messages(&huge_limit, "limit"),
        vec!["Limit must be between 1 and 100"]
    );

    let bad_status = app.get("/api/projects?status=MAYBE", Some(&user.token)).await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_project_detail() {
    let app = TestApp::new();
    let user = register_user(&app, "detail").await;
    let id = create_project(&app, &user.token, "Community hall roof").await;
    vote(&app, &user.token, id, "UPVOTE").await;

    let response = app.get(&format!("/api/projects/{id}"), Some(&user.token)).await;

    assert_success(&response, StatusCode::OK);
    let detail = &response.body["data"];
    assert_eq!(detail["id"], id);
    assert_eq!(detail["votes"][0]["vote_type"], "UPVOTE");
    assert_eq!(detail["votes"][0]["user"]["username"], "detail");
    assert_eq!(detail["vote_counts"]["total"], 1);
}

#[tokio::test]
async fn test_invalid_and_missing_ids() {
    let app = TestApp::new();
    let user = register_user(&app, "lost").await;

    for uri in ["/api/projects/abc", "/api/projects/0", "/api/projects/-3"] {
        let response = app.get(uri, Some(&user.token)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(field_messages(&response, "id"), vec!["Invalid ID parameter"]);
    }

    let missing = app.get("/api/projects/999", Some(&user.token)).await;
    assert_error(&missing, StatusCode::NOT_FOUND, "Project not found");
}

#[tokio::test]
async fn test_revote_keeps_one_vote() {
    let app = TestApp::new();
    let user = register_user(&app, "voter").await;
    let id = create_project(&app, &user.token, "Water treatment plant").await;

    let first = vote(&app, &user.token, id, "UPVOTE").await;
    assert_success(&first, StatusCode::CREATED);
    assert_eq!(first.body["message"], "Vote created successfully");

    let second = vote(&app, &user.token, id, "DOWNVOTE").await;
    assert_success(&second, StatusCode::OK);
    assert_eq!(second.body["message"], "Vote updated successfully");
    assert_eq!(second.body["data"]["id"], first.body["data"]["id"]);

    let votes = app
        .get(&format!("/api/projects/{id}/votes"), Some(&user.token))
        .await;
    assert_success(&votes, StatusCode::OK);
    assert_eq!(votes.body["data"]["project_id"], id);
    assert_eq!(votes.body["data"]["votes"].as_array().map(Vec::len), Some(1));
    assert_eq!(votes.body["data"]["votes"][0]["vote_type"], "DOWNVOTE");
    assert_eq!(
        votes.body["data"]["vote_counts"],
        json!({ "upvotes": 0, "downvotes": 1, "total": 1 })
    );
}

#[tokio::test]
async fn test_vote_validation_and_missing_project() {
    let app = TestApp::new();
    let user = register_user(&app, "voter").await;

    let missing = vote(&app, &user.token, 42, "UPVOTE").await;
    assert_error(&missing, StatusCode::NOT_FOUND, "Project not found");

    let id = create_project(&app, &user.token, "Bus shelter on Ikot road").await;
    let bad = vote(&app, &user.token, id, "SIDEWAYS").await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let votes = app
        .get("/api/projects/42/votes", Some(&user.token))
        .await;
    assert_error(&votes, StatusCode::NOT_FOUND, "Project not found");
}

#[tokio::test]
async fn test_update_project_ownership() {
    let app = TestApp::new();
    let owner = register_user(&app, "owner").await;
    let stranger = register_user(&app, "stranger").await;
    let id = create_project(&app, &owner.token, "Drainage for Ariaria market").await;
    let uri = format!("/api/projects/{id}");

    let denied = app
        .put(&uri, Some(&stranger.token), json!({ "title": "Hijacked title" }))
        .await;
    assert_error(&denied, StatusCode::FORBIDDEN, "Insufficient permissions");

    let updated = app
        .put(&uri, Some(&owner.token), json!({ "title": "Drainage for the market" }))
        .await;
    assert_success(&updated, StatusCode::OK);
    assert_eq!(updated.body["message"], "Project updated successfully");
    assert_eq!(updated.body["data"]["title"], "Drainage for the market");
    assert_eq!(updated.body["data"]["description"], DESCRIPTION);
}

#[tokio::test]
async fn test_only_admin_changes_project_status() {
    let app = TestApp::new();
    let owner = register_user(&app, "owner").await;
    let admin = create_admin(&app).await;
    let id = create_project(&app, &owner.token, "Solar panels for schools").await;
    let uri = format!("/api/projects/{id}");

    let ignored = app
        .put(&uri, Some(&owner.token), json!({ "status": "APPROVED" }))
        .await;
    assert_success(&ignored, StatusCode::OK);
    assert_eq!(ignored.body["data"]["status"], "PROPOSED");

    let applied = app
        .put(&uri, Some(&admin.token), json!({ "status": "REJECTED" }))
        .await;
    assert_success(&applied, StatusCode::OK);
    assert_eq!(applied.body["data"]["status"], "REJECTED");
}

#[tokio::test]
async fn test_missing_project_is_404_for_everyone() {
    let app = TestApp::new();
    let user = register_user(&app, "someone").await;
    let admin = create_admin(&app).await;
    let body = json!({ "title": "Whatever title" });

    for token in [&user.token, &admin.token] {
        let update = app.put("/api/projects/77", Some(token), body.clone()).await;
        assert_error(&update, StatusCode::NOT_FOUND, "Project not found");

        let delete = app.delete("/api/projects/77", Some(token)).await;
        assert_error(&delete, StatusCode::NOT_FOUND, "Project not found");
    }
}

#[tokio::test]
async fn test_delete_project() {
    let app = TestApp::new();
    let owner = register_user(&app, "owner").await;
    let stranger = register_user(&app, "stranger").await;
    let admin = create_admin(&app).await;
    let mine = create_project(&app, &owner.token, "Tree planting campaign").await;
    let other = create_project(&app, &owner.token, "Recycling collection point").await;
    vote(&app, &stranger.token, mine, "UPVOTE").await;

    let denied = app
        .delete(&format!("/api/projects/{mine}"), Some(&stranger.token))
        .await;
    assert_error(&denied, StatusCode::FORBIDDEN, "Insufficient permissions");

    let deleted = app
        .delete(&format!("/api/projects/{mine}"), Some(&owner.token))
        .await;
    assert_success(&deleted, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Project deleted successfully");
    assert_eq!(deleted.body.get("data"), None::<&Value>);

    let gone = app.get(&format!("/api/projects/{mine}"), Some(&owner.token)).await;
    assert_error(&gone, StatusCode::NOT_FOUND, "Project not found");

    let by_admin = app
        .delete(&format!("/api/projects/{other}"), Some(&admin.token))
        .await;
    assert_success(&by_admin, StatusCode::OK);
}
