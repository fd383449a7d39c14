//! The collection-level remote store with tri-state outcomes
//!
//! Every method here catches errors at the boundary and degrades them:
//! reads become [`Fetched::Unavailable`], writes become `false`, counters
//! become `0`. Nothing above this module ever sees a raw error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::{AnalyticsEvent, PartialSettings, Post, SiteSettings};
use crate::remote::client::RemoteClient;

const POSTS: &str = "posts";
const SETTINGS: &str = "settings";
const ANALYTICS: &str = "analytics";

/// The settings singleton's fixed row id
const SETTINGS_ROW_ID: i64 = 1;

/// Tri-state outcome of a remote read.
///
/// `Empty` and `Unavailable` are distinct on purpose: an empty remote must
/// not erase a non-empty local cache, and an unreachable remote must leave
/// local state standing entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// The remote answered with data
    Data(T),
    /// The remote answered, but holds nothing matching
    Empty,
    /// No client, network failure, or malformed response
    Unavailable,
}

/// Wire shape of a `settings` row: singleton id plus the full payload
#[derive(Debug, serde::Serialize, Deserialize)]
struct SettingsRow<T> {
    id: i64,
    data: T,
}

/// Collection-scoped operations against the hosted backend
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: RemoteClient,
}

impl RemoteStore {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    /// Fetch all posts, ordered by date descending
    pub async fn fetch_posts(&self) -> Fetched<Vec<Post>> {
        let result = self
            .client
            .from(POSTS)
            .select("*")
            .order("date", false)
            .execute::<Post>()
            .await;

        match result {
            Ok(rows) if rows.is_empty() => Fetched::Empty,
            Ok(rows) => {
                debug!(count = rows.len(), "fetched posts from cloud");
                Fetched::Data(rows)
            }
            Err(e) => {
                warn!(error = %e, "post fetch failed, falling back to local");
                Fetched::Unavailable
            }
        }
    }

    /// Fetch one post by its slug (last-write-wins on collisions)
    pub async fn fetch_post_by_slug(&self, slug: &str) -> Fetched<Post> {
        let result = self
            .client
            .from(POSTS)
            .select("*")
            .eq("slug", slug)
            .execute_one::<Post>()
            .await;

        match result {
            Ok(Some(post)) => Fetched::Data(post),
            Ok(None) => Fetched::Empty,
            Err(e) => {
                warn!(slug, error = %e, "post lookup failed");
                Fetched::Unavailable
            }
        }
    }

    /// Insert or replace a post row. Returns whether the cloud confirmed it.
    pub async fn upsert_post(&self, post: &Post) -> bool {
        match self.client.from(POSTS).upsert(post).execute_no_return().await {
            Ok(()) => true,
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "post upsert failed");
                false
            }
        }
    }

    /// Delete a post row by id. Returns whether the cloud confirmed it.
    pub async fn delete_post(&self, id: &str) -> bool {
        let result = self
            .client
            .from(POSTS)
            .delete()
            .eq("id", id)
            .execute_no_return()
            .await;

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(post_id = %id, error = %e, "post delete failed");
                false
            }
        }
    }

    /// Fetch the settings singleton payload
    pub async fn fetch_settings(&self) -> Fetched<PartialSettings> {
        let result = self
            .client
            .from(SETTINGS)
            .select("data")
            .eq("id", SETTINGS_ROW_ID)
            .execute_one::<SettingsRow<PartialSettings>>()
            .await;

        match result {
            Ok(Some(row)) => Fetched::Data(row.data),
            Ok(None) => Fetched::Empty,
            Err(e) => {
                warn!(error = %e, "settings fetch failed, falling back to local");
                Fetched::Unavailable
            }
        }
    }

    /// Persist the full settings object into the singleton row
    pub async fn upsert_settings(&self, settings: &SiteSettings) -> bool {
        let row = SettingsRow {
            id: SETTINGS_ROW_ID,
            data: settings,
        };
        match self.client.from(SETTINGS).upsert(&row).execute_no_return().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "settings upsert failed");
                false
            }
        }
    }

    /// Append a page-view record. Fire-and-forget: failures are logged only.
    pub async fn append_event(&self, event: &AnalyticsEvent) {
        if let Err(e) = self
            .client
            .from(ANALYTICS)
            .insert(event)
            .execute_no_return()
            .await
        {
            debug!(post_id = %event.post_id, error = %e, "analytics append dropped");
        }
    }

    /// Fetch all recorded events for one post
    pub async fn fetch_events(&self, post_id: &str) -> Fetched<Vec<AnalyticsEvent>> {
        let result = self
            .client
            .from(ANALYTICS)
            .select("*")
            .eq("post_id", post_id)
            .execute::<AnalyticsEvent>()
            .await;

        match result {
            Ok(rows) if rows.is_empty() => Fetched::Empty,
            Ok(rows) => Fetched::Data(rows),
            Err(e) => {
                warn!(post_id, error = %e, "analytics fetch failed");
                Fetched::Unavailable
            }
        }
    }

    /// Count events recorded since the given instant; 0 on any failure
    pub async fn count_events_since(&self, since: DateTime<Utc>) -> u64 {
        let result = self
            .client
            .from(ANALYTICS)
            .select("post_id")
            .gte("timestamp", since.to_rfc3339())
            .execute::<serde_json::Value>()
            .await;

        match result {
            Ok(rows) => rows.len() as u64,
            Err(e) => {
                debug!(error = %e, "event count failed, reporting zero");
                0
            }
        }
    }
}
