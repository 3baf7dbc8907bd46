/**
 * Update Sync Service
 *
 * One sync cycle:
 *
 * 1. Fetch a batch from the `FeedSource`. A fetch failure is logged and
 *    treated as an empty batch.
 * 2. Store each post whose external id is not already mirrored. The store's
 *    uniqueness rule is the final guard: a conflict on insert means another
 *    cycle got there first and is counted as already present. Any other
 *    per-item failure is logged and skipped.
 * 3. Prune everything beyond the newest `retention` posts. A prune failure
 *    fails the cycle.
 *
 * Cycles are not serialized against each other; overlapping cycles (timer
 * plus manual refresh) are safe because of step 2.
 */

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::backend::store::{SharedStore, StoreError, StoreResult, UpdateStore};
use crate::backend::updates::feed::FeedSource;
use crate::domain::{MirroredPost, NewMirroredPost};

/// Maximum mirrored posts kept after a cycle
pub const DEFAULT_RETENTION: usize = 1000;

/// Outcome of one sync cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Items returned by the feed
    pub fetched: usize,
    /// Newly mirrored posts
    pub stored: Vec<MirroredPost>,
    /// Posts removed by retention
    pub pruned: u64,
}

pub struct UpdateSync {
    store: SharedStore,
    feed: Arc<dyn FeedSource>,
    retention: usize,
}

impl UpdateSync {
    pub fn new(store: SharedStore, feed: Arc<dyn FeedSource>, retention: usize) -> Self {
        Self {
            store,
            feed,
            retention,
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Run one fetch, store and prune cycle
    pub async fn run_cycle(&self) -> Result<SyncReport, StoreError> {
        let batch = match self.feed.fetch_recent().await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!("Error fetching X updates: {}", e);
                Vec::new()
            }
        };

        let fetched = batch.len();
        let mut stored = Vec::new();
        for post in batch {
            let post_id = post.post_id.clone();
            match self.store_new(post).await {
                Ok(Some(mirrored)) => stored.push(mirrored),
                Ok(None) => {}
                Err(e) => tracing::error!("Failed to store X update {}: {}", post_id, e),
            }
        }

        let pruned = self.prune().await?;

        tracing::info!(
            "X update sync: fetched {}, stored {}, pruned {}",
            fetched,
            stored.len(),
            pruned
        );

        Ok(SyncReport {
            fetched,
            stored,
            pruned,
        })
    }

    /// `None` when the post is already mirrored
    async fn store_new(&self, post: NewMirroredPost) -> StoreResult<Option<MirroredPost>> {
        if self
            .store
            .find_post_by_external_id(&post.post_id)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        match self.store.insert_post(post, Utc::now()).await {
            Ok(mirrored) => Ok(Some(mirrored)),
            Err(StoreError::Conflict(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn prune(&self) -> StoreResult<u64> {
        let stale = self.store.post_ids_beyond(self.retention).await?;
        if stale.is_empty() {
            return Ok(0);
        }
        self.store.delete_posts(&stale).await
    }
}

/// Run `sync` every `every`, starting one period from now
///
/// Missed ticks are skipped rather than bunched. Cycle failures are logged and
/// the loop keeps going.
pub fn spawn_sync_loop(sync: Arc<UpdateSync>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            tracing::info!("Fetching X updates...");
            if let Err(e) = sync.run_cycle().await {
                tracing::error!("X update sync failed: {}", e);
            }
        }
    })
}
