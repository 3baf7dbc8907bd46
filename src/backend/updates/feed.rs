/**
 * X Recent-Search Feed
 *
 * `FeedSource` is the seam between the sync service and the outside world.
 * `XSearchFeed` implements it against the X API v2 recent-search endpoint:
 *
 * ```text
 * GET {base}/2/tweets/search/recent
 *     ?query=#AbiaState -is:retweet
 *     &tweet.fields=id,text,author_id,created_at
 *     &user.fields=username
 *     &expansions=author_id
 *     &max_results=10
 * Authorization: Bearer {X_API_KEY}
 * ```
 *
 * Author handles are resolved from `includes.users`; posts whose author is
 * not expanded get `Unknown`.
 */

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::NewMirroredPost;

pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("X API key is not configured")]
    MissingApiKey,

    #[error("request to X API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("X API responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// A source of recent posts to mirror
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_recent(&self) -> Result<Vec<NewMirroredPost>, FeedError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Tweet>,
    #[serde(default)]
    includes: Includes,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    id: String,
    text: String,
    author_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct Includes {
    #[serde(default)]
    users: Vec<XUser>,
}

#[derive(Debug, Deserialize)]
struct XUser {
    id: String,
    username: String,
}

impl SearchResponse {
    fn into_posts(self) -> Vec<NewMirroredPost> {
        let handles: HashMap<String, String> = self
            .includes
            .users
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        self.data
            .into_iter()
            .filter_map(|tweet| {
                let Some(posted_at) = tweet.created_at else {
                    tracing::warn!("Skipping post {} without created_at", tweet.id);
                    return None;
                };
                let author = tweet
                    .author_id
                    .as_ref()
                    .and_then(|id| handles.get(id))
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

                Some(NewMirroredPost {
                    post_id: tweet.id,
                    content: tweet.text,
                    author,
                    posted_at,
                })
            })
            .collect()
    }
}

/// Recent-search client for the X API
#[derive(Debug, Clone)]
pub struct XSearchFeed {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    query: String,
    max_results: u8,
}

impl XSearchFeed {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        query: impl Into<String>,
        max_results: u8,
    ) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            query: query.into(),
            max_results,
        })
    }
}

#[async_trait]
impl FeedSource for XSearchFeed {
    async fn fetch_recent(&self) -> Result<Vec<NewMirroredPost>, FeedError> {
        let api_key = self.api_key.as_deref().ok_or(FeedError::MissingApiKey)?;
        let max_results = self.max_results.to_string();

        let response = self
            .client
            .get(format!("{}/2/tweets/search/recent", self.base_url))
            .bearer_auth(api_key)
            .query(&[
                ("query", self.query.as_str()),
                ("tweet.fields", "id,text,author_id,created_at"),
                ("user.fields", "username"),
                ("expansions", "author_id"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        let payload: SearchResponse = response.json().await?;
        Ok(payload.into_posts())
    }
}
