//! In-process app harness
//!
//! Builds the same router `create_app` does, minus the database and the sync
//! timer, and sends requests through it one at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use oluora::backend::routes::create_router;
use oluora::backend::server::{build_state, AppConfig, AppState};
use oluora::backend::store::MemoryStore;
use oluora::backend::updates::{FeedError, FeedSource};
use oluora::domain::NewMirroredPost;

/// Feed whose next batch is set by the test
#[derive(Default)]
pub struct ScriptedFeed {
    batch: Mutex<Vec<NewMirroredPost>>,
    failing: AtomicBool,
}

impl ScriptedFeed {
    pub fn set_batch(&self, posts: Vec<NewMirroredPost>) {
        *self.batch.lock().unwrap() = posts;
        self.failing.store(false, Ordering::SeqCst);
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl FeedSource for ScriptedFeed {
    async fn fetch_recent(&self) -> Result<Vec<NewMirroredPost>, FeedError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FeedError::MissingApiKey);
        }
        Ok(self.batch.lock().unwrap().clone())
    }
}

pub fn post(external_id: &str, author: &str, posted_at: &str) -> NewMirroredPost {
    NewMirroredPost {
        post_id: external_id.to_string(),
        content: format!("Post {external_id} about #AbiaState"),
        author: author.to_string(),
        posted_at: posted_at.parse::<DateTime<Utc>>().unwrap(),
    }
}

/// Response with the body already parsed; `Value::Null` for an empty body
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub feed: Arc<ScriptedFeed>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_retention(1000)
    }

    pub fn with_retention(retention: usize) -> Self {
        let retention = retention.to_string();
        let mut config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some("integration-test-secret".to_string()),
            "BCRYPT_COST" => Some("4".to_string()),
            "X_RETENTION" => Some(retention.clone()),
            _ => None,
        })
        .unwrap();
        config.api_base_url = "http://test.local/api".to_string();

        let feed = Arc::new(ScriptedFeed::default());
        let state = build_state(&config, Arc::new(MemoryStore::new()), feed.clone());
        let router = create_router(state.clone());

        Self {
            router,
            state,
            feed,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }
}
