//! `PgStore` against a real Postgres schema

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use oluora::backend::store::{
    PgStore, ProjectStore, StoreError, TownhallStore, UpdateStore, UserStore,
};
use oluora::domain::{
    NewMirroredPost, NewProject, NewTownhall, NewUser, Page, ProjectChanges, ProjectFilter,
    ProjectStatus, Role, TownhallChanges, TownhallFilter, TownhallStatus, UpdateFilter, User,
    VoteType,
};

use crate::common::TestDatabase;

async fn user(store: &PgStore, username: &str) -> User {
    store
        .create_user(NewUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: Role::User,
        })
        .await
        .unwrap()
}

async fn project(store: &PgStore, proposer: &User, title: &str) -> i64 {
    store
        .create_project(NewProject {
            title: title.to_string(),
            description: "Resurface the market road before the rains".to_string(),
            proposer_id: proposer.id,
        })
        .await
        .unwrap()
        .id
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn mirrored(post_id: &str, author: &str, posted_at: DateTime<Utc>) -> NewMirroredPost {
    NewMirroredPost {
        post_id: post_id.to_string(),
        content: format!("Post {post_id}"),
        author: author.to_string(),
        posted_at,
    }
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();
    user(&store, "ada").await;

    let again = store
        .create_user(NewUser {
            email: "ada@example.com".to_string(),
            username: "ada_two".to_string(),
            password_hash: "x".to_string(),
            role: Role::User,
        })
        .await;

    assert_matches!(again, Err(StoreError::Conflict(_)));
    db.cleanup().await;
}

#[tokio::test]
async fn test_cast_vote_creates_then_overwrites() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();
    let voter = user(&store, "voter").await;
    let project_id = project(&store, &voter, "Market road").await;

    let first = store
        .cast_vote(voter.id, project_id, VoteType::Upvote)
        .await
        .unwrap();
    assert!(first.created);
    assert_eq!(first.vote.vote_type, VoteType::Upvote);

    let second = store
        .cast_vote(voter.id, project_id, VoteType::Downvote)
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.vote.id, first.vote.id);
    assert_eq!(second.vote.vote_type, VoteType::Downvote);

    let votes = store.project_votes(&[project_id]).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].vote_type, VoteType::Downvote);
    assert_eq!(votes[0].user.username, "voter");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);

    db.cleanup().await;
}

#[tokio::test]
async fn test_delete_project_removes_votes() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();
    let voter = user(&store, "voter").await;
    let project_id = project(&store, &voter, "Borehole").await;
    store
        .cast_vote(voter.id, project_id, VoteType::Upvote)
        .await
        .unwrap();

    store.delete_project(project_id).await.unwrap();

    assert!(store.get_project(project_id).await.unwrap().is_none());
    assert!(store.project_votes(&[project_id]).await.unwrap().is_empty());
    assert_matches!(
        store.delete_project(project_id).await,
        Err(StoreError::NotFound)
    );

    db.cleanup().await;
}

#[tokio::test]
async fn test_project_filters_and_update() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();
    let ada = user(&store, "ada").await;
    let bola = user(&store, "bola").await;
    let road = project(&store, &ada, "Market road").await;
    project(&store, &bola, "Borehole").await;

    let updated = store
        .update_project(
            road,
            ProjectChanges {
                status: Some(ProjectStatus::Approved),
                ..ProjectChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ProjectStatus::Approved);
    assert_eq!(updated.title, "Market road");
    assert_eq!(updated.proposer.username, "ada");

    let all = store
        .list_projects(&ProjectFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    let approved = store
        .list_projects(
            &ProjectFilter {
                status: Some(ProjectStatus::Approved),
                ..ProjectFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(approved.total, 1);
    assert_eq!(approved.items[0].id, road);

    let by_bola = store
        .list_projects(
            &ProjectFilter {
                proposer_id: Some(bola.id),
                ..ProjectFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_bola.total, 1);
    assert_eq!(by_bola.items[0].proposer.email, "bola@example.com");

    assert_matches!(
        store.update_project(road + 1000, ProjectChanges::default()).await,
        Err(StoreError::NotFound)
    );

    db.cleanup().await;
}

#[tokio::test]
async fn test_townhall_create_update_and_window() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();
    let organizer = user(&store, "organizer").await;
    let soon = Utc::now() + Duration::days(2);

    let created = store
        .create_townhall(NewTownhall {
            title: "Budget hearing".to_string(),
            description: "Open questions on the 2025 budget".to_string(),
            scheduled_at: soon,
            zoom_link: None,
            organizer_id: organizer.id,
        })
        .await
        .unwrap();
    assert_eq!(created.status, TownhallStatus::Scheduled);
    assert_eq!(created.organizer.username, "organizer");

    let updated = store
        .update_townhall(
            created.id,
            TownhallChanges {
                zoom_link: Some("https://zoom.us/j/123".to_string()),
                status: Some(TownhallStatus::Live),
                ..TownhallChanges::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.zoom_link.as_deref(), Some("https://zoom.us/j/123"));
    assert_eq!(updated.status, TownhallStatus::Live);
    assert_eq!(updated.title, "Budget hearing");

    let inside = store
        .list_townhalls(
            &TownhallFilter {
                status: Some(TownhallStatus::Live),
                from: Some(soon - Duration::days(1)),
                to: Some(soon + Duration::days(1)),
                ..TownhallFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(inside.total, 1);

    let outside = store
        .list_townhalls(
            &TownhallFilter {
                from: Some(soon + Duration::days(1)),
                ..TownhallFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(outside.total, 0);

    db.cleanup().await;
}

#[tokio::test]
async fn test_duplicate_post_id_is_conflict() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();

    store
        .insert_post(mirrored("1001", "AbiaGov", at(1, 9)), Utc::now())
        .await
        .unwrap();
    let again = store
        .insert_post(mirrored("1001", "AbiaGov", at(1, 9)), Utc::now())
        .await;

    assert_matches!(again, Err(StoreError::Conflict(_)));
    let found = store.find_post_by_external_id("1001").await.unwrap();
    assert_eq!(found.map(|p| p.author), Some("AbiaGov".to_string()));

    db.cleanup().await;
}

#[tokio::test]
async fn test_post_ids_beyond_breaks_ties_by_id() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();

    let oldest = store
        .insert_post(mirrored("1", "AbiaGov", at(1, 9)), Utc::now())
        .await
        .unwrap();
    let tied_first = store
        .insert_post(mirrored("2", "AbiaGov", at(2, 9)), Utc::now())
        .await
        .unwrap();
    let tied_second = store
        .insert_post(mirrored("3", "AbiaGov", at(2, 9)), Utc::now())
        .await
        .unwrap();

    let beyond = store.post_ids_beyond(1).await.unwrap();
    assert_eq!(beyond, vec![tied_first.id, oldest.id]);
    assert!(!beyond.contains(&tied_second.id));

    assert!(store.post_ids_beyond(3).await.unwrap().is_empty());

    let removed = store.delete_posts(&beyond).await.unwrap();
    assert_eq!(removed, 2);
    let remaining = store
        .list_posts(&UpdateFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].id, tied_second.id);

    db.cleanup().await;
}

#[tokio::test]
async fn test_author_filter_matches_underscore_literally() {
    let Some(db) = TestDatabase::connect().await else {
        return;
    };
    let store = db.store();

    store
        .insert_post(mirrored("1", "abia_gov", at(1, 9)), Utc::now())
        .await
        .unwrap();
    store
        .insert_post(mirrored("2", "abiaXgov", at(2, 9)), Utc::now())
        .await
        .unwrap();
    store
        .insert_post(mirrored("3", "100%Abia", at(3, 9)), Utc::now())
        .await
        .unwrap();

    let underscore = store
        .list_posts(
            &UpdateFilter {
                author: Some("A_G".to_string()),
                ..UpdateFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(underscore.total, 1);
    assert_eq!(underscore.items[0].author, "abia_gov");

    let percent = store
        .list_posts(
            &UpdateFilter {
                author: Some("0%a".to_string()),
                ..UpdateFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(percent.total, 1);
    assert_eq!(percent.items[0].author, "100%Abia");

    let dated = store
        .list_posts(
            &UpdateFilter {
                from: Some(at(2, 0)),
                to: Some(at(2, 23)),
                ..UpdateFilter::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(dated.total, 1);
    assert_eq!(dated.items[0].post_id, "2");

    db.cleanup().await;
}
